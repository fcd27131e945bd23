//! Error reporting for mods
//!
//! Records a failure to disk and tells the user about it on screen.

use crate::fault::Fault;
use crate::logging::{DiskResult, LineSink, LogCategory, StructuredLogger};
use crate::notify::{NotificationSurface, Notifier};

/// Logger plus notifier, the pair a mod reports errors through
#[derive(Debug, Clone)]
pub struct ErrorReporter<W, N> {
    logger: StructuredLogger<W>,
    notifier: Notifier<N>,
}

impl<W: LineSink, N: NotificationSurface> ErrorReporter<W, N> {
    pub fn new(logger: StructuredLogger<W>, notifier: Notifier<N>) -> Self {
        Self { logger, notifier }
    }

    pub fn logger(&self) -> &StructuredLogger<W> {
        &self.logger
    }

    pub fn notifier(&self) -> &Notifier<N> {
        &self.notifier
    }

    /// Log a failure to disk, then show the user a short notice
    ///
    /// Neither step can fail the caller, and a failed disk write does not stop
    /// the notice from being shown.
    pub fn record_error(
        &self,
        fault: &Fault,
        group: &str,
        page: &str,
        method: &str,
        friendly_message: &str,
    ) {
        self.logger.log_error(
            LogCategory::Error,
            group,
            page,
            method,
            friendly_message,
            &fault.description,
        );

        let notice = format!(
            "There was an error in the {} mod, {}.{}(), \"{}\".",
            group, page, method, friendly_message
        );
        self.notifier.notify(group, page, method, &notice, true);
    }

    /// Log a plain message and show it as a non-error notice
    ///
    /// The notice is shown even if the disk write fails; the write error is
    /// returned afterwards.
    pub fn announce(
        &self,
        group: &str,
        page: &str,
        method: &str,
        message: &str,
    ) -> DiskResult<()> {
        let written = self.logger.log_message(group, message);
        if let Err(err) = &written {
            tracing::warn!("Failed to write announcement for {}: {}", group, err);
        }
        self.notifier.notify(group, page, method, message, false);
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::DiskError;
    use crate::notify::NotificationCenter;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySink {
        fail: bool,
        lines: Mutex<Vec<String>>,
    }

    impl LineSink for MemorySink {
        fn append(&self, group: &str, line: &str) -> DiskResult<()> {
            if self.fail {
                return Err(DiskError::Contention {
                    path: PathBuf::from(group),
                });
            }
            self.lines.lock().unwrap().push(line.to_string());
            Ok(())
        }
    }

    fn reporter(fail: bool) -> ErrorReporter<MemorySink, NotificationCenter> {
        ErrorReporter::new(
            StructuredLogger::new(MemorySink {
                fail,
                ..Default::default()
            }),
            Notifier::new(NotificationCenter::new(5, None)),
        )
    }

    #[test]
    fn test_record_error_logs_and_notifies() {
        let reporter = reporter(false);
        let fault = Fault::new("NullReferenceException: obj is null");

        reporter.record_error(&fault, "DemoMod", "Combat", "Fire", "Could not fire weapon");

        let lines = reporter.logger().sink().lines.lock().unwrap().clone();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Error: NullReferenceException: obj is null"));
        assert!(lines[0].contains("(ERROR)"));

        let notices = reporter.notifier().surface().visible();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].subject, "DemoMod Error");
        assert_eq!(
            notices[0].body,
            "Error in function: Combat.Fire\nThere was an error in the DemoMod mod, Combat.Fire(), \"Could not fire weapon\"."
        );
    }

    #[test]
    fn test_record_error_notifies_when_disk_fails() {
        let reporter = reporter(true);
        reporter.record_error(&Fault::new("boom"), "DemoMod", "Combat", "Fire", "oops");

        assert!(reporter.logger().sink().lines.lock().unwrap().is_empty());
        assert_eq!(reporter.notifier().surface().len(), 1);
    }

    #[test]
    fn test_announce_returns_write_error_after_notifying() {
        let reporter = reporter(true);
        let result = reporter.announce("DemoMod", "Main", "OnTick", "Loaded");
        assert!(result.is_err());
        let notices = reporter.notifier().surface().visible();
        assert_eq!(notices[0].subject, "DemoMod Message");
        assert_eq!(notices[0].body, "Loaded");
    }
}
