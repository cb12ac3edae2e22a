//! Single-slot advisory message.
//!
//! Holds at most one message. A message stays visible for a fixed duration;
//! posting a new one or clearing replaces it immediately.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Advisory {
    duration: Duration,
    message: Option<(String, Instant)>,
}

impl Advisory {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            message: None,
        }
    }

    pub fn show(&mut self, msg: impl Into<String>) {
        self.show_at(msg, Instant::now());
    }

    pub fn show_at(&mut self, msg: impl Into<String>, now: Instant) {
        let msg = msg.into();
        log::debug!("advisory: {msg}");
        self.message = Some((msg, now));
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    /// The visible message, if any.
    pub fn current(&self) -> Option<&str> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<&str> {
        match &self.message {
            Some((msg, shown)) if now.saturating_duration_since(*shown) < self.duration => {
                Some(msg.as_str())
            }
            _ => None,
        }
    }

    /// Drops the message once it has expired.
    pub fn expire(&mut self, now: Instant) {
        if self.message.is_some() && self.current_at(now).is_none() {
            self.message = None;
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for Advisory {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
