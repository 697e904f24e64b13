//! Interface lifecycle controller
//!
//! Create is strict: any failure aborts the resource. Delete is forgiving:
//! failures are logged and reported as a skipped teardown, never raised, so
//! destroying a larger graph is not blocked by an interface already removed
//! out of band.

use crate::backend::Backend;
use crate::command::CommandRunner;
use crate::error::{Error, Result};
use crate::interface::{InterfaceInstance, InterfaceSpec, InterfaceState};
use crate::platform::Platform;
use tracing::{info, warn};

/// Result of a best-effort delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The teardown command succeeded
    Removed,
    /// Teardown failed or was not possible; the resource is still retired
    Skipped { reason: String },
}

/// Provider of local network interface resources
pub struct InterfaceProvider<R> {
    /// Host OS name, resolved to a platform on every call
    os: String,
    runner: R,
    rollback: bool,
}

impl<R: CommandRunner> InterfaceProvider<R> {
    /// Provider for the host this binary runs on
    pub fn new(runner: R) -> Self {
        Self::with_os(std::env::consts::OS, runner)
    }

    /// Provider for an explicit OS name
    pub fn with_os(os: impl Into<String>, runner: R) -> Self {
        Self {
            os: os.into(),
            runner,
            rollback: true,
        }
    }

    /// Undo applied steps when a create fails part way
    pub fn rollback(mut self, rollback: bool) -> Self {
        self.rollback = rollback;
        self
    }

    /// Bring an interface matching `spec` into existence
    ///
    /// Fails with [`Error::UnsupportedPlatform`] before touching the host when
    /// the OS has no backend; every other failure is wrapped in
    /// [`Error::InterfaceCreate`].
    pub fn create(&self, spec: &InterfaceSpec) -> Result<InterfaceState> {
        let platform = Platform::from_os(&self.os)?;
        let mut instance = InterfaceInstance::new(&spec.name);
        instance.create()?;

        let result = spec.validate().and_then(|()| {
            Backend::for_platform(platform).create(&self.runner, spec, self.rollback)
        });

        if let Err(e) = result {
            instance.fail()?;
            return Err(Error::InterfaceCreate {
                name: spec.name.clone(),
                source: Box::new(e),
            });
        }

        instance.created()?;
        info!(
            interface = %spec.name,
            platform = %platform,
            address = ?spec.address,
            state = ?instance.state(),
            "interface created"
        );

        Ok(InterfaceState::new(spec, platform))
    }

    /// Retire the interface identified by `id`
    ///
    /// Only `id` is used to locate the interface; `props` is the spec it was
    /// created from and is informational.
    pub fn delete(&self, id: &str, props: &InterfaceSpec) -> DeleteOutcome {
        match self.try_delete(id) {
            Ok(()) => {
                info!(interface = %id, address = ?props.address, "interface deleted");
                DeleteOutcome::Removed
            }
            Err(e) => {
                warn!(interface = %id, error = %e, "error while deleting interface");
                DeleteOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn try_delete(&self, id: &str) -> Result<()> {
        let platform = Platform::from_os(&self.os)?;
        let mut instance = InterfaceInstance::adopt(id)?;
        instance.delete()?;

        Backend::for_platform(platform).delete(&self.runner, id)?;
        instance.deleted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::RecordingRunner;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink for asserting on emitted events
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with logs at warn level and above captured
    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs.contents())
    }

    #[test]
    fn test_unsupported_platform_runs_nothing() {
        let runner = RecordingRunner::new();
        let provider = InterfaceProvider::with_os("windows", &runner);

        let err = provider
            .create(&InterfaceSpec::new("test0").address("10.0.0.1/24"))
            .unwrap_err();

        assert!(matches!(err, Error::UnsupportedPlatform(ref os) if os == "windows"));
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn test_create_linux_returns_state() {
        let runner = RecordingRunner::new();
        let provider = InterfaceProvider::with_os("linux", &runner);
        let spec = InterfaceSpec::new("test0").address("192.168.1.100/24");

        let state = provider.create(&spec).unwrap();

        assert_eq!(state.id, "test0");
        assert_eq!(state.name, "test0");
        assert_eq!(state.address.as_deref(), Some("192.168.1.100/24"));
        assert_eq!(state.platform, Platform::Linux);
        assert_eq!(runner.commands().len(), 3);
    }

    #[test]
    fn test_create_darwin_reports_platform() {
        let runner = RecordingRunner::new()
            .respond("ifconfig -a", "")
            .respond("ifconfig -a", "bridge0: flags=0 mtu 1500\n");
        let provider = InterfaceProvider::with_os("macos", &runner);

        let state = provider.create(&InterfaceSpec::new("test0")).unwrap();

        assert_eq!(state.platform, Platform::Darwin);
        assert_eq!(state.address, None);
    }

    #[test]
    fn test_create_failure_rolls_back() {
        let runner = RecordingRunner::new().fail("ip addr add", "Error: any valid prefix is expected");
        let provider = InterfaceProvider::with_os("linux", &runner);

        let err = provider
            .create(&InterfaceSpec::new("test0").address("10.0.0.1/24"))
            .unwrap_err();

        assert!(matches!(err, Error::InterfaceCreate { ref name, .. } if name == "test0"));
        assert!(matches!(err.root(), Error::CommandExecutionFailed { .. }));
        assert_eq!(
            runner.commands(),
            vec![
                "ip link add test0 type dummy",
                "ip link set test0 up",
                "ip addr add 10.0.0.1/24 dev test0",
                "ip link delete test0",
            ]
        );
    }

    #[test]
    fn test_create_failure_without_rollback() {
        let runner = RecordingRunner::new().fail("ip link set", "boom");
        let provider = InterfaceProvider::with_os("linux", &runner).rollback(false);

        assert!(provider.create(&InterfaceSpec::new("test0")).is_err());
        assert!(!runner.commands().iter().any(|c| c.contains("delete")));
    }

    #[test]
    fn test_invalid_spec_runs_nothing() {
        let runner = RecordingRunner::new();
        let provider = InterfaceProvider::with_os("linux", &runner);

        let err = provider
            .create(&InterfaceSpec::new("test0").address("10.0.0.1/99"))
            .unwrap_err();

        assert!(matches!(err.root(), Error::InvalidAddressFormat(_)));
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn test_create_linux_accepts_ipv6() {
        let runner = RecordingRunner::new();
        let provider = InterfaceProvider::with_os("linux", &runner);

        let state = provider
            .create(&InterfaceSpec::new("test0").address("fd00::1/64"))
            .unwrap();

        assert_eq!(state.address.as_deref(), Some("fd00::1/64"));
        assert_eq!(
            runner.commands().last().map(String::as_str),
            Some("ip addr add fd00::1/64 dev test0")
        );
    }

    #[test]
    fn test_malformed_address_runs_nothing() {
        for os in ["linux", "darwin"] {
            let runner = RecordingRunner::new();
            let provider = InterfaceProvider::with_os(os, &runner);

            let err = provider
                .create(&InterfaceSpec::new("test0").address("not-an-ip/24"))
                .unwrap_err();

            assert!(matches!(err.root(), Error::InvalidAddressFormat(_)), "{}", os);
            assert!(runner.commands().is_empty(), "{}", os);
        }
    }

    #[test]
    fn test_create_darwin_rejects_ipv6_before_any_command() {
        let runner = RecordingRunner::new();
        let provider = InterfaceProvider::with_os("darwin", &runner);

        let err = provider
            .create(&InterfaceSpec::new("test0").address("fd00::1/64"))
            .unwrap_err();

        assert!(matches!(err, Error::InterfaceCreate { .. }));
        assert!(matches!(err.root(), Error::InvalidAddressFormat(_)));
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn test_delete_linux() {
        let runner = RecordingRunner::new();
        let provider = InterfaceProvider::with_os("linux", &runner);

        let outcome = provider.delete("test0", &InterfaceSpec::new("test0"));

        assert_eq!(outcome, DeleteOutcome::Removed);
        assert_eq!(runner.commands(), vec!["ip link delete test0"]);
    }

    #[test]
    fn test_delete_darwin_destroys_bridge() {
        let runner = RecordingRunner::new();
        let provider = InterfaceProvider::with_os("darwin", &runner);

        provider.delete("test0", &InterfaceSpec::new("test0"));

        assert_eq!(runner.commands(), vec!["ifconfig test0 destroy"]);
    }

    #[test]
    fn test_delete_failure_is_swallowed() {
        let runner = RecordingRunner::new().fail("ip link delete", "Cannot find device \"test0\"");
        let provider = InterfaceProvider::with_os("linux", &runner);

        let (outcome, logs) =
            with_captured_logs(|| provider.delete("test0", &InterfaceSpec::new("test0")));

        match outcome {
            DeleteOutcome::Skipped { reason } => assert!(reason.contains("Cannot find device")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(logs.contains("WARN"), "logs: {}", logs);
        assert!(logs.contains("error while deleting interface"), "logs: {}", logs);
        assert!(logs.contains("Cannot find device"), "logs: {}", logs);
    }

    #[test]
    fn test_successful_delete_logs_no_warning() {
        let runner = RecordingRunner::new();
        let provider = InterfaceProvider::with_os("linux", &runner);

        let (outcome, logs) =
            with_captured_logs(|| provider.delete("test0", &InterfaceSpec::new("test0")));

        assert_eq!(outcome, DeleteOutcome::Removed);
        assert!(logs.is_empty(), "logs: {}", logs);
    }

    #[test]
    fn test_delete_twice_is_idempotent() {
        let runner = RecordingRunner::new()
            .respond("ip link delete", "")
            .fail("ip link delete", "Cannot find device \"test0\"");
        let provider = InterfaceProvider::with_os("linux", &runner);
        let props = InterfaceSpec::new("test0");

        assert_eq!(provider.delete("test0", &props), DeleteOutcome::Removed);
        assert!(matches!(
            provider.delete("test0", &props),
            DeleteOutcome::Skipped { .. }
        ));
        assert_eq!(runner.commands().len(), 2);
    }

    #[test]
    fn test_delete_on_unsupported_platform_is_skipped() {
        let runner = RecordingRunner::new();
        let provider = InterfaceProvider::with_os("windows", &runner);

        assert!(matches!(
            provider.delete("test0", &InterfaceSpec::new("test0")),
            DeleteOutcome::Skipped { .. }
        ));
        assert!(runner.commands().is_empty());
    }
}
