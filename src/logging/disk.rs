//! Daily log files on disk
//!
//! Appends lines to `<root>/<group>/<YYYY-MM-DD>.log`. A write that finds the
//! file locked by another writer sleeps for a fixed interval and starts over;
//! any other failure is returned to the caller.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use fs2::FileExt;

use super::error::{is_contention_error, DiskError, DiskResult};

/// Characters that cannot appear in a group directory name
pub const RESERVED_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Default delay between contended write attempts
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Destination for formatted log lines
pub trait LineSink {
    /// Append one formatted line for the given group
    fn append(&self, group: &str, line: &str) -> DiskResult<()>;
}

/// Something that can block the current thread
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Source of the local time used for file names and timestamps
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// How contended writes are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed delay between attempts
    pub interval: Duration,
    /// Retry limit (None = retry until the write succeeds)
    pub max_retries: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_RETRY_INTERVAL,
            max_retries: None,
        }
    }
}

impl RetryPolicy {
    /// Run `attempt` until it returns anything other than a contention failure
    pub fn run<T, S, F>(&self, sleeper: &S, mut attempt: F) -> DiskResult<T>
    where
        S: Sleeper + ?Sized,
        F: FnMut() -> DiskResult<T>,
    {
        let mut retries: u32 = 0;
        loop {
            match attempt() {
                Err(DiskError::Contention { path }) => {
                    if self.max_retries.is_some_and(|max| retries >= max) {
                        return Err(DiskError::RetriesExhausted { path, retries });
                    }
                    retries = next_retry(retries);
                    tracing::debug!(
                        "{} in use, retry {} in {:?}",
                        path.display(),
                        retries,
                        self.interval
                    );
                    sleeper.sleep(self.interval);
                }
                other => return other,
            }
        }
    }
}

fn next_retry(retries: u32) -> u32 {
    retries.saturating_add(1)
}

/// Replace filesystem-reserved characters in a group name with `_`
///
/// Names that would resolve to the log root or its parent (`""`, `.`, `..`)
/// become `_`.
pub fn sanitize_group(group: &str) -> String {
    if matches!(group, "" | "." | "..") {
        return "_".to_string();
    }
    group
        .chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// File name for the day containing `now`
pub fn day_file_name(now: &DateTime<Local>) -> String {
    format!("{}.log", now.format("%Y-%m-%d"))
}

/// Disk writer rooted at a log directory
#[derive(Debug, Clone)]
pub struct DiskWriter<S = ThreadSleeper> {
    root: PathBuf,
    retry: RetryPolicy,
    sleeper: S,
    clock: Arc<dyn Clock>,
}

impl DiskWriter<ThreadSleeper> {
    /// Create a writer that retries contended writes forever
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_policy(root, RetryPolicy::default())
    }

    /// Create a writer with a specific retry policy
    pub fn with_policy(root: impl Into<PathBuf>, retry: RetryPolicy) -> Self {
        Self {
            root: root.into(),
            retry,
            sleeper: ThreadSleeper,
            clock: Arc::new(SystemClock),
        }
    }
}

impl<S: Sleeper> DiskWriter<S> {
    /// Replace the sleeper used between retries
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> DiskWriter<T> {
        DiskWriter {
            root: self.root,
            retry: self.retry,
            sleeper,
            clock: self.clock,
        }
    }

    /// Replace the clock that picks the day file and timestamps lines
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Base log directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Retry policy in effect
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Directory holding the files of a group
    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.root.join(sanitize_group(group))
    }

    /// Path of the file a write at `now` lands in
    pub fn log_file_path(&self, group: &str, now: &DateTime<Local>) -> PathBuf {
        self.group_dir(group).join(day_file_name(now))
    }

    /// Ensure the root and group directories exist
    ///
    /// Safe to call repeatedly and from racing writers.
    pub fn ensure_group_dir(&self, group: &str) -> DiskResult<PathBuf> {
        let dir = self.group_dir(group);
        fs::create_dir_all(&dir).map_err(|source| DiskError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Append a line, retrying while the file is held by another writer
    pub fn append_line(&self, group: &str, line: &str) -> DiskResult<()> {
        self.retry
            .run(&self.sleeper, || self.try_append(group, line))
    }

    /// One append attempt; the path is derived from the clock on every call
    fn try_append(&self, group: &str, line: &str) -> DiskResult<()> {
        let now = self.clock.now();
        let dir = self.ensure_group_dir(group)?;
        let path = dir.join(day_file_name(&now));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| open_error(&path, source))?;

        file.try_lock_exclusive()
            .map_err(|source| open_error(&path, source))?;

        let record = format!("{}\t\t{}\n", now.format("%H:%M:%S%.3f"), line);
        let written = (&file)
            .write_all(record.as_bytes())
            .and_then(|_| (&file).flush());

        // Closing the file also releases the lock
        if let Err(e) = FileExt::unlock(&file) {
            tracing::debug!("Failed to unlock {}: {}", path.display(), e);
        }

        written.map_err(|source| DiskError::Write { path, source })
    }
}

impl<S: Sleeper> LineSink for DiskWriter<S> {
    fn append(&self, group: &str, line: &str) -> DiskResult<()> {
        self.append_line(group, line)
    }
}

fn open_error(path: &Path, source: std::io::Error) -> DiskError {
    if is_contention_error(&source) {
        DiskError::Contention {
            path: path.to_path_buf(),
        }
    } else {
        DiskError::Open {
            path: path.to_path_buf(),
            source,
        }
    }
}
