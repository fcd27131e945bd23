//! Disk write failures and their classification

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for disk writes
pub type DiskResult<T> = Result<T, DiskError>;

/// Failure while appending a line to a log file
#[derive(Debug, Error)]
pub enum DiskError {
    /// The day file is held by another writer
    #[error("log file {path} is in use by another writer")]
    Contention { path: PathBuf },

    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write log file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Only reachable when a retry limit has been configured
    #[error("log file {path} still in use after {retries} retries")]
    RetriesExhausted { path: PathBuf, retries: u32 },
}

impl DiskError {
    /// Categorize this failure
    pub fn kind(&self) -> DiskErrorKind {
        match self {
            DiskError::Contention { .. } | DiskError::RetriesExhausted { .. } => {
                DiskErrorKind::Contention
            }
            DiskError::CreateDir { source, .. }
            | DiskError::Open { source, .. }
            | DiskError::Write { source, .. } => categorize_io_error(source),
        }
    }

    /// Whether this failure should be retried
    pub fn is_contention(&self) -> bool {
        matches!(self, DiskError::Contention { .. })
    }
}

/// Categories of disk errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// File is locked or in use by another writer
    Contention,
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    /// Get a short description for this error kind
    pub fn description(&self) -> &'static str {
        match self {
            DiskErrorKind::Contention => "log file in use",
            DiskErrorKind::DiskFull => "disk full",
            DiskErrorKind::PermissionDenied => "permission denied",
            DiskErrorKind::NotFound => "file or directory not found",
            DiskErrorKind::Other => "disk I/O failure",
        }
    }
}

/// Categorize an IO error
pub fn categorize_io_error(e: &io::Error) -> DiskErrorKind {
    use io::ErrorKind;

    if is_contention_error(e) {
        return DiskErrorKind::Contention;
    }

    match e.kind() {
        ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC = 28, EDQUOT = 122 on Linux, 69 on macOS
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                }
            }
            #[cfg(windows)]
            {
                // ERROR_HANDLE_DISK_FULL = 39, ERROR_DISK_FULL = 112
                if matches!(e.raw_os_error(), Some(39) | Some(112)) {
                    return DiskErrorKind::DiskFull;
                }
            }
            DiskErrorKind::Other
        }
    }
}

/// Whether an IO error means another writer holds the file
///
/// Matches on the OS error code; an error that merely shares the contended
/// error's `ErrorKind` does not count.
pub fn is_contention_error(e: &io::Error) -> bool {
    #[cfg(windows)]
    {
        // ERROR_SHARING_VIOLATION = 32, ERROR_LOCK_VIOLATION = 33
        matches!(e.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        e.raw_os_error().is_some() && e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
    }
}
