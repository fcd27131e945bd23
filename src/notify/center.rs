//! In-process notification surface
//!
//! Keeps a bounded queue of posted notices for hosts that render them
//! themselves once per frame.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

use super::{NotificationIcon, NotificationSurface};

/// A notice posted to the center
#[derive(Debug, Clone)]
pub struct PostedNotice {
    /// Unique identifier
    pub id: Uuid,
    pub icon: NotificationIcon,
    pub sender: String,
    pub subject: String,
    pub body: String,
    pub blinking: bool,
    /// When the notice was posted
    pub created_at: Instant,
    /// How long before auto-dismiss (None = manual dismiss only)
    pub auto_dismiss: Option<Duration>,
}

impl PostedNotice {
    /// Check if this notice should be dismissed
    pub fn should_dismiss(&self) -> bool {
        self.auto_dismiss
            .is_some_and(|duration| self.created_at.elapsed() >= duration)
    }
}

/// Queue of posted notices
#[derive(Debug)]
pub struct NotificationCenter {
    notices: Mutex<VecDeque<PostedNotice>>,
    max_visible: usize,
    auto_dismiss: Option<Duration>,
}

impl NotificationCenter {
    /// Create a center showing up to `max_visible` notices
    pub fn new(max_visible: usize, auto_dismiss: Option<Duration>) -> Self {
        Self {
            notices: Mutex::new(VecDeque::new()),
            max_visible,
            auto_dismiss,
        }
    }

    /// Remove expired notices; call once per frame
    pub fn tick(&self) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.retain(|n| !n.should_dismiss());
        }
    }

    /// Most recent notices first, up to `max_visible`
    pub fn visible(&self) -> Vec<PostedNotice> {
        self.notices
            .lock()
            .map(|n| n.iter().rev().take(self.max_visible).cloned().collect())
            .unwrap_or_default()
    }

    /// Dismiss a notice by ID
    pub fn dismiss(&self, id: Uuid) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.retain(|n| n.id != id);
        }
    }

    /// Dismiss all notices
    pub fn dismiss_all(&self) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.notices.lock().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(3, Some(Duration::from_secs(10)))
    }
}

impl NotificationSurface for NotificationCenter {
    fn show(&self, icon: NotificationIcon, sender: &str, subject: &str, body: &str, blinking: bool) {
        let notice = PostedNotice {
            id: Uuid::new_v4(),
            icon,
            sender: sender.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            blinking,
            created_at: Instant::now(),
            auto_dismiss: self.auto_dismiss,
        };

        if let Ok(mut notices) = self.notices.lock() {
            notices.push_back(notice);
            // Trim excess notices (oldest first)
            while notices.len() > self.max_visible * 2 {
                notices.pop_front();
            }
        }
    }
}
