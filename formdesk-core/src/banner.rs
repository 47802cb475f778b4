//! Transient status banners.

use chrono::{DateTime, Duration, Utc};

/// Default lifetime of a banner before it dismisses itself.
pub const DEFAULT_BANNER_TTL_MS: i64 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerLevel {
    Success,
    Error,
    Info,
}

impl BannerLevel {
    pub fn label(&self) -> &'static str {
        match self {
            BannerLevel::Success => "SUCCESS",
            BannerLevel::Error => "ERROR",
            BannerLevel::Info => "INFO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl Banner {
    pub fn new(level: BannerLevel, message: impl Into<String>, raised_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            level,
            message: message.into(),
            raised_at,
            ttl,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.raised_at + self.ttl
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Holds at most one banner. A newer banner replaces the current one along
/// with its pending dismissal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerSlot {
    current: Option<Banner>,
    ttl: Duration,
}

impl Default for BannerSlot {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_BANNER_TTL_MS))
    }
}

impl BannerSlot {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }

    pub fn raise_at(&mut self, level: BannerLevel, message: impl Into<String>, now: DateTime<Utc>) {
        self.current = Some(Banner::new(level, message, now, self.ttl));
    }

    pub fn raise(&mut self, level: BannerLevel, message: impl Into<String>) {
        self.raise_at(level, message, Utc::now());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.raise(BannerLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.raise(BannerLevel::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.raise(BannerLevel::Info, message);
    }

    /// Clear the banner once its lifetime has elapsed. Returns whether it did.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        if self.current.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.current = None;
            return true;
        }
        false
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Dismiss the current banner only if it reports an error.
    pub fn clear_errors(&mut self) -> bool {
        if self.current.as_ref().is_some_and(|b| b.level == BannerLevel::Error) {
            self.current = None;
            return true;
        }
        false
    }
}
