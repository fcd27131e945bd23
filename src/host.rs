//! Host tick integration
//!
//! The host calls into mods once per frame. [`StartupAnnouncer`] waits for the
//! first frame where the host is ready and announces the mod once.

use crate::logging::{LineSink, LogCategory};
use crate::notify::NotificationSurface;
use crate::report::ErrorReporter;

/// Page name used for startup entries
const PAGE: &str = "Main";
const METHOD: &str = "OnTick";

/// Identity of a mod
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModInfo {
    pub name: String,
    pub version: String,
    pub developer: String,
}

impl ModInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        developer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            developer: developer.into(),
        }
    }

    /// `<name> <version> by <developer> Loaded`
    pub fn loaded_message(&self) -> String {
        format!("{} {} by {} Loaded", self.name, self.version, self.developer)
    }
}

/// What a tick handler wants from the host afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep calling on every frame
    Continue,
    /// Stop calling; the handler is done
    Unsubscribe,
}

/// Announces a mod once the host is ready
#[derive(Debug, Clone)]
pub struct StartupAnnouncer {
    info: ModInfo,
    announced: bool,
}

impl StartupAnnouncer {
    pub fn new(info: ModInfo) -> Self {
        Self {
            info,
            announced: false,
        }
    }

    pub fn info(&self) -> &ModInfo {
        &self.info
    }

    pub fn has_announced(&self) -> bool {
        self.announced
    }

    /// Handle one host frame
    ///
    /// Does nothing until `host_ready`; then writes the loaded message to disk,
    /// shows it as a notice and unsubscribes. A failed write is recorded as an
    /// error rather than retried on the next frame.
    pub fn on_tick<W, N>(&mut self, host_ready: bool, reporter: &ErrorReporter<W, N>) -> TickOutcome
    where
        W: LineSink,
        N: NotificationSurface,
    {
        if self.announced {
            return TickOutcome::Unsubscribe;
        }
        if !host_ready {
            return TickOutcome::Continue;
        }

        self.announced = true;
        let message = self.info.loaded_message();
        if let Err(err) = reporter.announce(&self.info.name, PAGE, METHOD, &message) {
            reporter.logger().log_error(
                LogCategory::Error,
                &self.info.name,
                PAGE,
                METHOD,
                "Could not write the startup message",
                &err.to_string(),
            );
        }
        tracing::info!("{}", message);
        TickOutcome::Unsubscribe
    }
}
