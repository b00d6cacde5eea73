//! Timed user-facing messages. One slot, newest wins, auto-expiring; the
//! shell never stacks notifications.
//!
//! Core code never reads a clock; "now" arrives from the bridge (js
//! `Date.now()` in the browser, a literal in tests).

use serde::Serialize;

/// How long a notification stays up.
pub const DISMISS_MS: f64 = 3_000.0;

/// Pause between a success notice and the follow-up navigation on update and
/// auth flows.
pub const NAVIGATE_DELAY_MS: f64 = 2_000.0;

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Serialize, Clone, PartialEq, Debug)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

#[derive(Default)]
pub struct NoticeBoard {
    slot: Option<(Notice, f64)>,
}

impl NoticeBoard {
    pub fn post(&mut self, text: impl Into<String>, kind: NoticeKind, now_ms: f64) {
        let notice = Notice {
            text: text.into(),
            kind,
        };
        self.slot = Some((notice, now_ms + DISMISS_MS));
    }

    /// The visible notification, if any. Expired ones are dropped on read.
    pub fn current(&mut self, now_ms: f64) -> Option<&Notice> {
        if let Some((_, expires_at)) = self.slot {
            if now_ms >= expires_at {
                self.slot = None;
            }
        }
        self.slot.as_ref().map(|(notice, _)| notice)
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
