//! Disk logging for raptor-log
//!
//! Line formatting, the daily-file disk writer with contention retry, and the
//! structured logger that sits on top of both.

mod category;
mod disk;
mod error;
mod format;
mod logger;
mod subscriber;

pub use category::LogCategory;
pub use disk::{
    day_file_name, sanitize_group, Clock, DiskWriter, LineSink, RetryPolicy, Sleeper, SystemClock,
    ThreadSleeper, DEFAULT_RETRY_INTERVAL, RESERVED_CHARS,
};
pub use error::{categorize_io_error, is_contention_error, DiskError, DiskErrorKind, DiskResult};
pub use format::{
    categorized_error_line, diagnostic_line, message_line, render_fields, single_line,
    DiagnosticFields, Field, ERROR_MARKER, MESSAGE_MARKER,
};
pub use logger::{Diagnostic, StructuredLogger, LIBRARY_GROUP};
pub use subscriber::{init_tracing, DEFAULT_FILTER};
