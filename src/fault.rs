//! Error descriptions handed to the logger
//!
//! A `Fault` is the human-readable description of a failure plus, when the
//! source has one, the text of its stack trace.

use std::error::Error;
use std::fmt;

/// Returned when no line number can be recovered from a stack trace
pub const UNKNOWN_LINE: &str = "UNKNOWN ";

/// Description of a failure being logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Human-readable description
    pub description: String,
    /// Stack trace text, if the source provided one
    pub stack_trace: Option<String>,
}

impl Fault {
    /// Create a fault without a stack trace
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            stack_trace: None,
        }
    }

    /// Attach stack trace text
    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    /// Build a fault from an error and its chain of sources, joined by `": "`
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let chain: Vec<String> = std::iter::successors(Some(err), |e: &&(dyn Error + 'static)| (*e).source())
            .map(|e| e.to_string())
            .collect();
        Self::new(chain.join(": "))
    }

    /// Best-effort source line of the failure
    pub fn line_number(&self) -> String {
        exception_line_number(self.stack_trace.as_deref())
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl From<&anyhow::Error> for Fault {
    fn from(err: &anyhow::Error) -> Self {
        Self::new(format!("{:#}", err))
    }
}

/// Recover a line number from stack trace text
///
/// Looks at the text after the last path separator, e.g. `Combat.cs:line 42`,
/// and returns the token after its first space when it mentions `line`.
pub fn exception_line_number(stack_trace: Option<&str>) -> String {
    let Some(trace) = stack_trace else {
        return UNKNOWN_LINE.to_string();
    };

    let tail = trace
        .rsplit(|c| c == '\\' || c == '/')
        .next()
        .unwrap_or(trace);
    if !tail.contains("line") {
        return UNKNOWN_LINE.to_string();
    }

    tail.split(' ')
        .nth(1)
        .map(|token| token.trim_end().to_string())
        .unwrap_or_else(|| UNKNOWN_LINE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_line_number_from_windows_trace() {
        let trace = r"   at DemoMod.Combat.Fire() in C:\mods\DemoMod\Combat.cs:line 42";
        assert_eq!(exception_line_number(Some(trace)), "42");
    }

    #[test]
    fn test_line_number_from_unix_trace() {
        let trace = "   at DemoMod.Combat.Fire() in /home/me/DemoMod/Combat.cs:line 7";
        assert_eq!(exception_line_number(Some(trace)), "7");
    }

    #[test]
    fn test_line_number_unknown_without_token() {
        assert_eq!(exception_line_number(Some(r"C:\mods\Combat.cs")), UNKNOWN_LINE);
        assert_eq!(exception_line_number(None), UNKNOWN_LINE);
        assert_eq!(exception_line_number(Some("")), UNKNOWN_LINE);
    }

    #[test]
    fn test_fault_from_error_includes_sources() {
        let inner = io::Error::new(io::ErrorKind::NotFound, "weapon.cfg missing");
        let outer = anyhow::Error::new(inner).context("could not load weapon");
        let fault = Fault::from(&outer);
        assert_eq!(fault.description, "could not load weapon: weapon.cfg missing");
        assert_eq!(fault.line_number(), UNKNOWN_LINE);
    }

    #[test]
    fn test_fault_from_std_error() {
        let err = io::Error::new(io::ErrorKind::Other, "obj is null");
        let fault = Fault::from_error(&err);
        assert_eq!(fault.to_string(), "obj is null");
    }

    #[derive(Debug)]
    struct LoadError {
        source: io::Error,
    }

    impl fmt::Display for LoadError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("could not load weapon")
        }
    }

    impl Error for LoadError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.source)
        }
    }

    #[test]
    fn test_fault_from_error_walks_source_chain() {
        let err = LoadError {
            source: io::Error::new(io::ErrorKind::NotFound, "weapon.cfg missing"),
        };
        let fault = Fault::from_error(&err);
        assert_eq!(fault.description, "could not load weapon: weapon.cfg missing");
        assert_eq!(fault.stack_trace, None);
    }

    #[test]
    fn test_fault_with_stack_trace() {
        let fault = Fault::new("boom").with_stack_trace(r"at X() in C:\a\B.cs:line 3");
        assert_eq!(fault.line_number(), "3");
    }
}
