//! Transient notices shown after saves, submits and review actions
use std::time::{Duration, Instant};

/// How long a notice stays visible
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    posted_at: Instant,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            posted_at: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted_at) >= NOTICE_TTL
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

/// At most one visible notice; a new one replaces the old
#[derive(Debug, Clone, Default)]
pub struct NoticeSlot {
    current: Option<Notice>,
}

impl NoticeSlot {
    pub fn post(&mut self, notice: Notice) {
        self.current = Some(notice);
    }

    /// The visible notice, if it has not auto-dismissed yet
    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref().filter(|n| !n.is_expired())
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires_after_ttl() {
        let notice = Notice::success("Saved");
        let posted = notice.posted_at;
        assert!(!notice.is_expired_at(posted + Duration::from_millis(3999)));
        assert!(notice.is_expired_at(posted + NOTICE_TTL));
    }

    #[test]
    fn test_slot_replaces_and_dismisses() {
        let mut slot = NoticeSlot::default();
        slot.post(Notice::info("one"));
        slot.post(Notice::error("two"));
        assert_eq!(slot.current().unwrap().message, "two");
        assert_eq!(slot.current().unwrap().kind, NoticeKind::Error);
        slot.dismiss();
        assert!(slot.current().is_none());
    }
}
