//! hostiface - local network interface provisioner
//!
//! Brings dummy network interfaces into existence on Linux (iproute2 dummy
//! links) and macOS (renamed ifconfig bridges), tracks them in a ledger and
//! removes them again on teardown.

mod backend;
mod cli;
mod command;
mod error;
mod interface;
mod ledger;
mod manifest;
mod netmask;
mod platform;
mod provider;
mod stack;

use cli::{Cli, Commands};
use command::SystemRunner;
use error::Result;
use interface::InterfaceSpec;
use ledger::Ledger;
use manifest::HostifaceConfig;
use provider::{DeleteOutcome, InterfaceProvider};
use stack::Stack;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by RUST_LOG (default warn, debug with --verbose)
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        // Commands that don't require config
        Commands::Completion { shell } => {
            Cli::generate_completion(shell);
        }

        Commands::Netmask { address } => {
            let split = netmask::split(&address)?;
            println!("address: {}", split.address);
            println!("netmask: {}", split.netmask.as_deref().unwrap_or("-"));
        }

        // Single-resource commands; config only tunes privilege and rollback
        Commands::Create {
            name,
            address,
            json,
        } => {
            let config = load_optional(&cli.config)?;
            let provider = provider(&config);

            let mut spec = InterfaceSpec::new(name);
            if let Some(address) = address {
                spec = spec.address(address);
            }

            let state = provider.create(&spec)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                println!(
                    "Created interface '{}' ({}) address {}",
                    state.name,
                    state.platform,
                    state.address.as_deref().unwrap_or("none")
                );
            }
        }

        Commands::Delete { id } => {
            let config = load_optional(&cli.config)?;
            let provider = provider(&config);

            let props = config
                .get_interface(&id)
                .cloned()
                .unwrap_or_else(|| InterfaceSpec::new(id.as_str()));

            match provider.delete(&id, &props) {
                DeleteOutcome::Removed => println!("Deleted interface '{}'", id),
                DeleteOutcome::Skipped { reason } => {
                    println!("Interface '{}' retired (teardown skipped: {})", id, reason)
                }
            }
        }

        // Declarative commands
        Commands::Up => {
            let mut stack = load_stack(&cli.config)?;
            let created = stack.up()?;

            if created.is_empty() {
                println!("All interfaces already present.");
            } else {
                for name in &created {
                    println!("Created interface '{}'", name);
                }
            }
            println!("Ledger: {}", stack.ledger().path().display());
        }

        Commands::Down => {
            let mut stack = load_stack(&cli.config)?;
            let outcomes = stack.down()?;

            if outcomes.is_empty() {
                println!("No recorded interfaces.");
            }
            for (id, outcome) in outcomes {
                match outcome {
                    DeleteOutcome::Removed => println!("Deleted interface '{}'", id),
                    DeleteOutcome::Skipped { .. } => {
                        println!("Retired interface '{}' (teardown skipped)", id)
                    }
                }
            }
        }

        Commands::Status { json } => {
            let stack = load_stack(&cli.config)?;
            let entries = stack.status();

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("{:<16} {:<20} {:<10}", "NAME", "ADDRESS", "STATE");
                println!("{}", "-".repeat(48));

                for entry in entries {
                    let state = match (entry.configured, entry.recorded) {
                        (true, true) => "present",
                        (true, false) => "absent",
                        (false, _) => "orphaned",
                    };
                    println!(
                        "{:<16} {:<20} {:<10}",
                        entry.name,
                        entry.address.as_deref().unwrap_or("-"),
                        state
                    );
                }
            }
        }

        Commands::Check => {
            let config = load(&cli.config)?;
            let platform = platform::Platform::detect();

            println!("Configuration is valid.");
            match platform {
                Ok(p) => println!("\nPlatform: {}", p),
                Err(e) => println!("\nPlatform: {}", e),
            }
            println!("Privilege: {:?}", config.config.privilege());
            println!("Rollback: {}", config.config.rollback());
            println!("Ledger: {}", config.config.ledger_path().display());

            println!("\nInterfaces:");
            for iface in &config.interfaces {
                let address = iface.address.as_deref().unwrap_or("-");
                match iface.address.as_deref().and_then(|a| netmask::split(a).ok()) {
                    Some(netmask::SplitAddress {
                        netmask: Some(mask),
                        ..
                    }) => println!("  {}: {} (netmask {})", iface.name, address, mask),
                    _ => println!("  {}: {}", iface.name, address),
                }
            }
        }
    }

    Ok(())
}

fn load(paths: &[PathBuf]) -> Result<HostifaceConfig> {
    match paths {
        [single] => manifest::load(single),
        many => manifest::load_merged(many),
    }
}

/// Config for single-resource commands: a missing default file means defaults
fn load_optional(paths: &[PathBuf]) -> Result<HostifaceConfig> {
    if paths.iter().all(|p| !p.exists()) {
        return Ok(HostifaceConfig::default());
    }
    load(paths)
}

fn provider(config: &HostifaceConfig) -> InterfaceProvider<SystemRunner> {
    InterfaceProvider::new(SystemRunner::new(config.config.privilege()))
        .rollback(config.config.rollback())
}

fn load_stack(paths: &[PathBuf]) -> Result<Stack<SystemRunner>> {
    let config = load(paths)?;
    let ledger = Ledger::load(&config.config.ledger_path())?;
    let provider = provider(&config);
    Ok(Stack::new(config, ledger, provider))
}
