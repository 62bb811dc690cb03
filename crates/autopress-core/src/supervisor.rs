//! Global failure supervisor
//!
//! Last-resort safety net for failures that escape every local handler. The
//! supervisor is an explicit, injectable object constructed once at program
//! start and passed down, so tests can install a fake process control without
//! touching real process-wide state. It never retries anything: it classifies,
//! logs at fatal level, and terminates the process only for critical
//! severity.

use crate::error::{AutopressResult, StructuredError};
use crate::logging::Logger;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Process termination seam. The real implementation exits; tests record.
pub trait ProcessControl: Send + Sync {
    fn exit(&self, code: i32);
}

/// Terminates the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcess;

impl ProcessControl for SystemProcess {
    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}

// The panic hook is process-wide; only the first supervisor may claim it.
static PANIC_HOOK_CLAIMED: OnceCell<()> = OnceCell::new();

/// Process-wide failure handler.
pub struct FailureSupervisor {
    logger: Arc<dyn Logger>,
    process: Arc<dyn ProcessControl>,
}

impl FailureSupervisor {
    pub fn new(logger: Arc<dyn Logger>, process: Arc<dyn ProcessControl>) -> Arc<Self> {
        Arc::new(Self { logger, process })
    }

    /// Register the process panic hook, exactly once per process lifetime.
    ///
    /// A second install attempt, from this or any other supervisor, returns
    /// an explicit error: duplicate hooks are always a wiring bug.
    pub fn install(self: &Arc<Self>) -> AutopressResult<()> {
        PANIC_HOOK_CLAIMED
            .set(())
            .map_err(|_| StructuredError::internal("failure supervisor already installed"))?;
        let supervisor = Arc::clone(self);
        std::panic::set_hook(Box::new(move |info| {
            let message = panic_message(info);
            supervisor.handle_failure(StructuredError::internal(message));
        }));
        Ok(())
    }

    /// Handle a failure that escaped all local handling.
    ///
    /// Raw errors are classified on the way in. The failure is logged at
    /// fatal level with its category and severity attached; the process is
    /// terminated only when severity is critical.
    pub fn handle_failure(&self, error: impl Into<StructuredError>) {
        let error = error.into();
        self.logger.fatal("unhandled failure", Some(&error), None);
        if error.severity.is_critical() {
            self.process.exit(1);
        }
    }

    /// Handle a non-fatal runtime warning. Never terminates.
    pub fn handle_warning(&self, message: &str) {
        self.logger.warn(message, None);
    }

    /// Adopt a detached task so its outcome cannot go unobserved.
    ///
    /// A task that panics or resolves to an error routes into
    /// [`handle_failure`](Self::handle_failure). Returns the watcher handle,
    /// mainly so tests can await it.
    pub fn watch_task(
        self: &Arc<Self>,
        name: &str,
        handle: JoinHandle<AutopressResult<()>>,
    ) -> JoinHandle<()> {
        let supervisor = Arc::clone(self);
        let name = name.to_string();
        tokio::spawn(async move {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    supervisor.handle_failure(error.with_metadata("task", name));
                }
                Err(join_error) => {
                    supervisor.handle_failure(StructuredError::internal(format!(
                        "task {name} panicked: {join_error}"
                    )));
                }
            }
        })
    }
}

fn panic_message(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    match info.location() {
        Some(location) => format!("panic at {location}: {message}"),
        None => format!("panic: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubProcess {
        exits: Mutex<Vec<i32>>,
    }

    impl ProcessControl for StubProcess {
        fn exit(&self, code: i32) {
            self.exits.lock().unwrap().push(code);
        }
    }

    #[derive(Default)]
    struct CollectingLogger {
        fatal_lines: Mutex<Vec<(String, Option<Severity>)>>,
        warn_count: AtomicUsize,
    }

    impl Logger for CollectingLogger {
        fn debug(&self, _message: &str, _context: Option<&serde_json::Value>) {}
        fn info(&self, _message: &str, _context: Option<&serde_json::Value>) {}
        fn warn(&self, _message: &str, _context: Option<&serde_json::Value>) {
            self.warn_count.fetch_add(1, Ordering::SeqCst);
        }
        fn error(
            &self,
            _message: &str,
            _error: Option<&StructuredError>,
            _context: Option<&serde_json::Value>,
        ) {
        }
        fn fatal(
            &self,
            message: &str,
            error: Option<&StructuredError>,
            _context: Option<&serde_json::Value>,
        ) {
            self.fatal_lines
                .lock()
                .unwrap()
                .push((message.to_string(), error.map(|e| e.severity)));
        }
    }

    fn supervisor_with_stubs() -> (
        Arc<FailureSupervisor>,
        Arc<CollectingLogger>,
        Arc<StubProcess>,
    ) {
        let logger = Arc::new(CollectingLogger::default());
        let process = Arc::new(StubProcess::default());
        let supervisor = FailureSupervisor::new(logger.clone(), process.clone());
        (supervisor, logger, process)
    }

    #[test]
    fn test_critical_failure_terminates() {
        let (supervisor, logger, process) = supervisor_with_stubs();
        supervisor.handle_failure(StructuredError::internal("logic bug"));
        assert_eq!(*process.exits.lock().unwrap(), vec![1]);
        // The fatal line is written before the exit decision.
        let lines = logger.fatal_lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].1, Some(Severity::Critical));
    }

    #[test]
    fn test_non_critical_failure_keeps_process_alive() {
        let (supervisor, logger, process) = supervisor_with_stubs();
        supervisor.handle_failure(StructuredError::network("connection reset"));
        supervisor.handle_failure(StructuredError::timeout("slow upstream"));
        supervisor.handle_failure(StructuredError::database("down").with_status_code(503));
        assert!(process.exits.lock().unwrap().is_empty());
        assert_eq!(logger.fatal_lines.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_warning_never_terminates() {
        let (supervisor, logger, process) = supervisor_with_stubs();
        supervisor.handle_warning("deprecated config key");
        assert!(process.exits.lock().unwrap().is_empty());
        assert_eq!(logger.warn_count.load(Ordering::SeqCst), 1);
        assert!(logger.fatal_lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_raw_failures_are_classified() {
        let (supervisor, _logger, process) = supervisor_with_stubs();
        let raw: Box<dyn std::error::Error + Send + Sync> =
            "401 unauthorized".to_string().into();
        // Classifies as authentication, which is critical.
        supervisor.handle_failure(raw);
        assert_eq!(*process.exits.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_install_is_exactly_once() {
        let (first, _, _) = supervisor_with_stubs();
        let (second, _, _) = supervisor_with_stubs();
        // Only this test touches install(); the hook claim is process-wide.
        assert!(first.install().is_ok());
        assert!(first.install().is_err());
        assert!(second.install().is_err());
    }

    #[tokio::test]
    async fn test_watch_task_routes_task_errors() {
        let (supervisor, logger, process) = supervisor_with_stubs();
        let task = tokio::spawn(async { Err(StructuredError::network("connection refused")) });
        supervisor
            .watch_task("publish", task)
            .await
            .expect("watcher must not panic");
        assert_eq!(logger.fatal_lines.lock().unwrap().len(), 1);
        assert!(process.exits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_watch_task_routes_panics_as_internal() {
        let (supervisor, logger, process) = supervisor_with_stubs();
        let task: JoinHandle<AutopressResult<()>> =
            tokio::spawn(async { panic!("worker exploded") });
        supervisor
            .watch_task("digest", task)
            .await
            .expect("watcher must not panic");
        assert_eq!(logger.fatal_lines.lock().unwrap().len(), 1);
        // Panics classify as internal and are critical.
        assert_eq!(*process.exits.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_watch_task_ignores_success() {
        let (supervisor, logger, _process) = supervisor_with_stubs();
        let task = tokio::spawn(async { Ok(()) });
        supervisor
            .watch_task("stats", task)
            .await
            .expect("watcher must not panic");
        assert!(logger.fatal_lines.lock().unwrap().is_empty());
    }
}
