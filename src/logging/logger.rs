//! Structured logger
//!
//! Builds message, diagnostic and categorized error lines and hands them to a
//! [`LineSink`]. The diagnostic and categorized error paths never return an
//! error: a failed write is turned into one fallback entry describing the
//! failure, and the fallback itself is allowed to fail.

use std::path::Path;

use crate::fault::Fault;

use super::category::LogCategory;
use super::disk::{DiskWriter, LineSink, Sleeper};
use super::error::{DiskError, DiskResult};
use super::format::{self, DiagnosticFields};

/// Group the logger files its own failures under
pub const LIBRARY_GROUP: &str = "RaptorLibrary";

const COMPONENT: &str = "StructuredLogger";

/// A diagnostic entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostic {
    /// Selects the `ERROR` marker instead of `Message`
    pub is_error: bool,
    /// Free text written right after the marker
    pub exception: String,
    pub group: String,
    pub page: String,
    pub method: String,
    pub error_line: String,
    pub friendly_message: String,
    pub technical_message: String,
}

impl Diagnostic {
    /// Start a non-error diagnostic for a call site
    pub fn message(
        group: impl Into<String>,
        page: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            page: page.into(),
            method: method.into(),
            ..Default::default()
        }
    }

    /// Start an error diagnostic for a call site
    pub fn error(
        group: impl Into<String>,
        page: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            is_error: true,
            ..Self::message(group, page, method)
        }
    }

    pub fn exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = exception.into();
        self
    }

    pub fn error_line(mut self, error_line: impl Into<String>) -> Self {
        self.error_line = error_line.into();
        self
    }

    pub fn friendly(mut self, message: impl Into<String>) -> Self {
        self.friendly_message = message.into();
        self
    }

    pub fn technical(mut self, message: impl Into<String>) -> Self {
        self.technical_message = message.into();
        self
    }

    /// Render this entry as a diagnostic line
    pub fn render(&self) -> String {
        format::diagnostic_line(
            self.is_error,
            &self.exception,
            &DiagnosticFields {
                page: &self.page,
                method: &self.method,
                error_line: &self.error_line,
                friendly_message: &self.friendly_message,
                technical_message: &self.technical_message,
            },
        )
    }
}

/// Logger writing structured lines through a sink
#[derive(Debug, Clone)]
pub struct StructuredLogger<W = DiskWriter> {
    sink: W,
    library_group: String,
}

impl<W: LineSink> StructuredLogger<W> {
    /// Create a logger over a sink
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            library_group: LIBRARY_GROUP.to_string(),
        }
    }

    /// Change the group used for the logger's own failures
    pub fn with_library_group(mut self, group: impl Into<String>) -> Self {
        self.library_group = group.into();
        self
    }

    /// The underlying sink
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Group used for the logger's own failures
    pub fn library_group(&self) -> &str {
        &self.library_group
    }

    /// Write a plain message line
    ///
    /// Failures are returned to the caller; there is no fallback on this path.
    pub fn log_message(&self, group: &str, text: &str) -> DiskResult<()> {
        self.sink.append(group, &format::message_line(text))
    }

    /// Write a short non-error diagnostic with page, method and message
    pub fn log_note(&self, group: &str, page: &str, method: &str, friendly_message: &str) {
        self.log_diagnostic(&Diagnostic::message(group, page, method).friendly(friendly_message));
    }

    /// Write a diagnostic line
    ///
    /// Never fails. If the write does not go through, one fallback line naming
    /// this operation and the failure is written to the library group.
    pub fn log_diagnostic(&self, diagnostic: &Diagnostic) {
        let Err(err) = self.sink.append(&diagnostic.group, &diagnostic.render()) else {
            return;
        };

        tracing::warn!(
            "Failed to write diagnostic for {}: {}",
            diagnostic.group,
            err
        );

        let description = err.to_string();
        let fallback = format::diagnostic_line(
            true,
            err.kind().description(),
            &DiagnosticFields {
                page: COMPONENT,
                method: "log_diagnostic",
                friendly_message: "Failed to write a diagnostic line",
                technical_message: &description,
                ..Default::default()
            },
        );

        if let Err(fallback_err) = self.sink.append(&self.library_group, &fallback) {
            tracing::error!("Fallback diagnostic write failed: {}", fallback_err);
        }
    }

    /// Write a categorized error line
    ///
    /// Never fails. Any code that is not a known category is written as
    /// `Unknown`. If the write does not go through, a diagnostic describing the
    /// failed call (with the caller's group, page and method) is logged instead.
    pub fn log_error(
        &self,
        category: impl Into<LogCategory>,
        group: &str,
        page: &str,
        method: &str,
        friendly_message: &str,
        technical_error: &str,
    ) {
        let category = category.into();
        let line =
            format::categorized_error_line(category, page, method, technical_error, friendly_message);

        if let Err(err) = self.sink.append(group, &line) {
            self.log_error_failure(&err, group, page, method);
        }
    }

    fn log_error_failure(&self, err: &DiskError, group: &str, page: &str, method: &str) {
        tracing::warn!("Failed to write error line for {}: {}", group, err);

        let fault = Fault::new(err.to_string());
        let diagnostic = Diagnostic::error(self.library_group.clone(), COMPONENT, "log_error")
            .exception(fault.description.clone())
            .error_line(fault.line_number())
            .friendly(format!(
                "There was an error logging the error from mod \"{}\" on page \"{}\" in method \"{}\".",
                group, page, method
            ))
            .technical(fault.description);

        self.log_diagnostic(&diagnostic);
    }
}

impl<S: Sleeper> StructuredLogger<DiskWriter<S>> {
    /// Base log directory of the disk writer
    pub fn log_root(&self) -> &Path {
        self.sink.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Sink that fails the first `fail_first` appends, then records lines
    #[derive(Default)]
    struct ScriptedSink {
        fail_first: usize,
        attempts: Mutex<usize>,
        lines: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedSink {
        fn failing(fail_first: usize) -> Self {
            Self {
                fail_first,
                ..Default::default()
            }
        }

        fn attempts(&self) -> usize {
            *self.attempts.lock().unwrap()
        }

        fn lines(&self) -> Vec<(String, String)> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl LineSink for ScriptedSink {
        fn append(&self, group: &str, line: &str) -> DiskResult<()> {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            if *attempts <= self.fail_first {
                return Err(DiskError::Write {
                    path: PathBuf::from(group).join("2026-01-01.log"),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
                });
            }
            self.lines
                .lock()
                .unwrap()
                .push((group.to_string(), line.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_log_message_writes_text() {
        let logger = StructuredLogger::new(ScriptedSink::default());
        logger.log_message("DemoMod", "DemoMod 0.1 Loaded").unwrap();
        assert_eq!(
            logger.sink().lines(),
            vec![("DemoMod".to_string(), "DemoMod 0.1 Loaded".to_string())]
        );
    }

    #[test]
    fn test_log_message_propagates_failure() {
        let logger = StructuredLogger::new(ScriptedSink::failing(1));
        let err = logger.log_message("DemoMod", "hello").unwrap_err();
        assert!(matches!(err, DiskError::Write { .. }));
        assert_eq!(logger.sink().attempts(), 1);
        assert!(logger.sink().lines().is_empty());
    }

    #[test]
    fn test_log_error_line() {
        let logger = StructuredLogger::new(ScriptedSink::default());
        logger.log_error(
            LogCategory::Error,
            "DemoMod",
            "Combat",
            "Fire",
            "Could not fire weapon",
            "NullReferenceException: obj is null",
        );
        let lines = logger.sink().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, "DemoMod");
        assert_eq!(
            lines[0].1,
            "Page: Combat\tMethod: Fire\tError: NullReferenceException: obj is null\t\t(ERROR)\t\"Could not fire weapon\""
        );
    }

    #[test]
    fn test_log_error_unrecognized_code_is_unknown() {
        let logger = StructuredLogger::new(ScriptedSink::default());
        logger.log_error(17, "DemoMod", "P", "M", "F", "T");
        let lines = logger.sink().lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].1.contains("(UNKNOWN)"));
    }

    #[test]
    fn test_log_error_failure_writes_one_fallback_diagnostic() {
        let logger = StructuredLogger::new(ScriptedSink::failing(1));
        logger.log_error(LogCategory::Error, "DemoMod", "Combat", "Fire", "friendly", "tech");

        let lines = logger.sink().lines();
        assert_eq!(lines.len(), 1);
        let (group, line) = &lines[0];
        assert_eq!(group, LIBRARY_GROUP);
        assert!(line.starts_with(format::ERROR_MARKER));
        assert!(line.contains("\tPage: StructuredLogger\tMethod: log_error"));
        assert!(line.contains("from mod \"DemoMod\" on page \"Combat\" in method \"Fire\""));
        assert!(line.contains("access denied"));
        assert!(!line.contains("(ERROR)"));
    }

    #[test]
    fn test_log_error_never_propagates_when_everything_fails() {
        let logger = StructuredLogger::new(ScriptedSink::failing(usize::MAX));
        logger.log_error(LogCategory::Error, "DemoMod", "Combat", "Fire", "friendly", "tech");
        // error line, diagnostic about it, fallback for the diagnostic
        assert_eq!(logger.sink().attempts(), 3);
        assert!(logger.sink().lines().is_empty());
    }

    #[test]
    fn test_log_diagnostic_line() {
        let logger = StructuredLogger::new(ScriptedSink::default());
        let diagnostic = Diagnostic::error("DemoMod", "Combat", "Fire")
            .error_line("42")
            .friendly("Could not fire")
            .technical("obj is null");
        logger.log_diagnostic(&diagnostic);

        let lines = logger.sink().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].1,
            "  ERROR : \tPage: Combat\tMethod: Fire\tError Line: 42\t\"Could not fire\"\tError Message: \"obj is null\""
        );
    }

    #[test]
    fn test_log_diagnostic_failure_writes_fallback_to_library_group() {
        let logger =
            StructuredLogger::new(ScriptedSink::failing(1)).with_library_group("MyLibrary");
        logger.log_diagnostic(&Diagnostic::message("DemoMod", "Main", "OnTick").friendly("hi"));

        let lines = logger.sink().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, "MyLibrary");
        assert!(lines[0].1.contains("Method: log_diagnostic"));
        assert!(lines[0].1.contains("Failed to write a diagnostic line"));
    }

    #[test]
    fn test_log_diagnostic_fallback_names_failure_kind() {
        let logger = StructuredLogger::new(ScriptedSink::failing(1));
        logger.log_diagnostic(&Diagnostic::error("DemoMod", "Combat", "Fire"));

        let lines = logger.sink().lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0]
            .1
            .starts_with("  ERROR : permission denied\tPage: StructuredLogger"));
        assert!(lines[0].1.contains("Error Message: \"failed to write"));
    }

    #[test]
    fn test_log_diagnostic_fallback_failure_is_swallowed() {
        let logger = StructuredLogger::new(ScriptedSink::failing(2));
        logger.log_diagnostic(&Diagnostic::message("DemoMod", "Main", "OnTick"));
        assert_eq!(logger.sink().attempts(), 2);
    }

    #[test]
    fn test_log_note() {
        let logger = StructuredLogger::new(ScriptedSink::default());
        logger.log_note("DemoMod", "Main", "OnTick", "Loaded");
        assert_eq!(
            logger.sink().lines()[0].1,
            "Message : \tPage: Main\tMethod: OnTick\t\"Loaded\""
        );
    }
}
