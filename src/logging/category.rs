//! Category label for categorized error lines

/// Outcome category attached to a categorized error line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Success,
    Error,
    /// Also chosen for any code that is not recognized
    Unknown,
}

impl LogCategory {
    /// Decode a numeric category code
    ///
    /// `0` is Success, `1` is Error; every other value maps to Unknown.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => LogCategory::Success,
            1 => LogCategory::Error,
            _ => LogCategory::Unknown,
        }
    }

    /// Get the display label for this category
    pub fn label(&self) -> &'static str {
        match self {
            LogCategory::Success => "Success",
            LogCategory::Error => "Error",
            LogCategory::Unknown => "Unknown",
        }
    }
}

impl From<i32> for LogCategory {
    fn from(code: i32) -> Self {
        LogCategory::from_code(code)
    }
}
