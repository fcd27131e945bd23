//! On-screen notices
//!
//! The host owns the actual notification surface; this module composes the
//! subject and body and forwards them.

mod center;

use serde::{Deserialize, Serialize};

pub use center::{NotificationCenter, PostedNotice};

/// Sender shown on notices by default
pub const DEFAULT_SENDER: &str = "RaptorLibrary";

/// Icon shown next to a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationIcon {
    #[default]
    Bugstars,
    Info,
    Warning,
}

impl NotificationIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationIcon::Bugstars => "bugstars",
            NotificationIcon::Info => "info",
            NotificationIcon::Warning => "warning",
        }
    }
}

/// External surface notices are shown on
///
/// Fire-and-forget: nothing is returned to the caller.
pub trait NotificationSurface {
    fn show(&self, icon: NotificationIcon, sender: &str, subject: &str, body: &str, blinking: bool);
}

impl<T: NotificationSurface + ?Sized> NotificationSurface for &T {
    fn show(&self, icon: NotificationIcon, sender: &str, subject: &str, body: &str, blinking: bool) {
        (**self).show(icon, sender, subject, body, blinking)
    }
}

impl<T: NotificationSurface + ?Sized> NotificationSurface for std::sync::Arc<T> {
    fn show(&self, icon: NotificationIcon, sender: &str, subject: &str, body: &str, blinking: bool) {
        (**self).show(icon, sender, subject, body, blinking)
    }
}

/// Subject and body of a notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub subject: String,
    pub body: String,
}

impl Notice {
    /// Compose the notice for a call site
    pub fn compose(group: &str, page: &str, method: &str, message: &str, is_error: bool) -> Self {
        if is_error {
            Self {
                subject: format!("{} Error", group),
                body: format!("Error in function: {}.{}\n{}", page, method, message),
            }
        } else {
            Self {
                subject: format!("{} Message", group),
                body: message.to_string(),
            }
        }
    }
}

/// Forwards composed notices to a surface
#[derive(Debug, Clone)]
pub struct Notifier<N> {
    surface: N,
    sender: String,
    icon: NotificationIcon,
    blinking: bool,
}

impl<N: NotificationSurface> Notifier<N> {
    /// Create a notifier with the default sender, icon and blinking on
    pub fn new(surface: N) -> Self {
        Self {
            surface,
            sender: DEFAULT_SENDER.to_string(),
            icon: NotificationIcon::default(),
            blinking: true,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn with_icon(mut self, icon: NotificationIcon) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_blinking(mut self, blinking: bool) -> Self {
        self.blinking = blinking;
        self
    }

    /// The surface notices are forwarded to
    pub fn surface(&self) -> &N {
        &self.surface
    }

    /// Compose a notice and show it
    pub fn notify(&self, group: &str, page: &str, method: &str, message: &str, is_error: bool) {
        let notice = Notice::compose(group, page, method, message, is_error);
        self.surface.show(
            self.icon,
            &self.sender,
            &notice.subject,
            &notice.body,
            self.blinking,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_error_notice() {
        let notice = Notice::compose("DemoMod", "Combat", "Fire", "It broke", true);
        assert_eq!(notice.subject, "DemoMod Error");
        assert_eq!(notice.body, "Error in function: Combat.Fire\nIt broke");
    }

    #[test]
    fn test_compose_message_notice() {
        let notice = Notice::compose("DemoMod", "Main", "OnTick", "Loaded", false);
        assert_eq!(notice.subject, "DemoMod Message");
        assert_eq!(notice.body, "Loaded");
    }

    #[test]
    fn test_notify_forwards_to_surface() {
        let center = NotificationCenter::default();
        let notifier = Notifier::new(&center).with_sender("DemoSender");

        notifier.notify("DemoMod", "Combat", "Fire", "It broke", true);

        let posted = center.visible();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].sender, "DemoSender");
        assert_eq!(posted[0].icon, NotificationIcon::Bugstars);
        assert_eq!(posted[0].subject, "DemoMod Error");
        assert!(posted[0].blinking);
    }
}
