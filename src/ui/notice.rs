//! Short-lived status messages shown in the footer.

use std::time::{Duration, Instant};

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn color(self) -> Color {
        match self {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NoticeLevel::Info => " INFO ",
            NoticeLevel::Warning => " WARN ",
            NoticeLevel::Error => " ERROR ",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    created_at: Instant,
    duration: Duration,
}

impl Notice {
    pub fn new(message: impl Into<String>, level: NoticeLevel) -> Self {
        let duration = match level {
            NoticeLevel::Error => Duration::from_secs(6),
            _ => Duration::from_secs(3),
        };
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }
}

/// Holds the most recent notice until it expires
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, level: NoticeLevel) {
        self.current = Some(Notice::new(message, level));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, NoticeLevel::Info);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(message, NoticeLevel::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, NoticeLevel::Error);
    }

    /// Drop the notice once it has been shown long enough.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    fn update_at(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|n| n.is_expired_at(now)) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_notice_replaces_older() {
        let mut board = NoticeBoard::new();
        board.info("first");
        board.error("second");
        let current = board.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.level, NoticeLevel::Error);
    }

    #[test]
    fn notices_expire() {
        let mut board = NoticeBoard::new();
        board.warn("careful");
        let later = Instant::now() + Duration::from_secs(4);

        board.update_at(Instant::now());
        assert!(board.current().is_some());
        board.update_at(later);
        assert!(board.current().is_none());
    }

    #[test]
    fn errors_stay_longer() {
        let notice = Notice::new("boom", NoticeLevel::Error);
        assert!(!notice.is_expired_at(Instant::now() + Duration::from_secs(4)));
        assert!(notice.is_expired_at(Instant::now() + Duration::from_secs(7)));
    }
}
