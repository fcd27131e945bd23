//! Configuration management for raptor-log

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::logging::{DiskWriter, RetryPolicy, StructuredLogger, LIBRARY_GROUP};
use crate::notify::{NotificationIcon, NotificationSurface, Notifier, DEFAULT_SENDER};
use crate::report::ErrorReporter;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "RAPTOR_LOG_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "raptor-log.toml";

/// Log root used when none is configured, relative to the working directory
pub const DEFAULT_LOG_ROOT: &str = "scripts/RaptorLibraryLogs";

/// Library configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Base directory for group log folders (`~` is expanded, relative paths
    /// are resolved against the working directory)
    #[serde(default = "default_log_root")]
    pub log_root: String,

    /// Delay between attempts when a log file is in use (default: 100ms)
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Give up after this many contended attempts (default: never)
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// Group the logger writes its own failures to
    #[serde(default = "default_library_group")]
    pub library_group: String,

    /// Sender shown on notices
    #[serde(default = "default_sender")]
    pub sender: String,

    /// Icon shown on notices (`bugstars`, `info` or `warning`)
    #[serde(default)]
    pub icon: NotificationIcon,

    /// Whether notices blink
    #[serde(default = "default_blink")]
    pub blink: bool,
}

fn default_log_root() -> String {
    DEFAULT_LOG_ROOT.to_string()
}

fn default_retry_interval_ms() -> u64 {
    100
}

fn default_library_group() -> String {
    LIBRARY_GROUP.to_string()
}

fn default_sender() -> String {
    DEFAULT_SENDER.to_string()
}

fn default_blink() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_root: default_log_root(),
            retry_interval_ms: default_retry_interval_ms(),
            max_retries: None,
            library_group: default_library_group(),
            sender: default_sender(),
            icon: NotificationIcon::default(),
            blink: default_blink(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, or defaults
    ///
    /// Lookup order: `$RAPTOR_LOG_CONFIG`, `./raptor-log.toml`, then
    /// `raptor-log/config.toml` under the user config directory.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load_from(Path::new(&path));
        }

        let candidates = [Some(PathBuf::from(LOCAL_CONFIG_FILE)), user_config_file_path()];
        for path in candidates.into_iter().flatten() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Log root as an absolute path
    pub fn resolved_log_root(&self) -> Result<PathBuf> {
        let expanded = PathBuf::from(shellexpand::tilde(&self.log_root).into_owned());
        if expanded.is_absolute() {
            return Ok(expanded);
        }
        let cwd = std::env::current_dir().context("Failed to read working directory")?;
        Ok(cwd.join(expanded))
    }

    /// Retry policy for contended writes
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(self.retry_interval_ms),
            max_retries: self.max_retries,
        }
    }

    /// Disk writer for the configured root and retry policy
    pub fn disk_writer(&self) -> Result<DiskWriter> {
        Ok(DiskWriter::with_policy(
            self.resolved_log_root()?,
            self.retry_policy(),
        ))
    }

    /// Structured logger over the configured disk writer
    pub fn logger(&self) -> Result<StructuredLogger> {
        Ok(StructuredLogger::new(self.disk_writer()?).with_library_group(&self.library_group))
    }

    /// Notifier over a host surface with the configured sender, icon and blink flag
    pub fn notifier<N: NotificationSurface>(&self, surface: N) -> Notifier<N> {
        Notifier::new(surface)
            .with_sender(&self.sender)
            .with_icon(self.icon)
            .with_blinking(self.blink)
    }

    /// Logger and notifier wired together
    pub fn reporter<N: NotificationSurface>(
        &self,
        surface: N,
    ) -> Result<ErrorReporter<DiskWriter, N>> {
        Ok(ErrorReporter::new(self.logger()?, self.notifier(surface)))
    }
}

/// Path of the per-user config file, if a config directory is known
pub fn user_config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("raptor-log").join("config.toml"))
}
