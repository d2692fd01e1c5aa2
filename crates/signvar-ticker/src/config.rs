#![forbid(unsafe_code)]

//! Ticker settings and their persisted form.
//!
//! Fields at their defaults (`mode = none`, `interval = 1`, no pauses) are
//! omitted when serialised.

use serde::{Deserialize, Serialize};

/// Animation applied to an entry's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    #[default]
    None,
    /// Content moves left, one character per step.
    Left,
    /// Content moves right, one character per step.
    Right,
    /// Text alternates with an all-space frame.
    Blink,
}

impl TickMode {
    #[inline]
    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

/// One entry of a pause schedule: run for `delay` steps, then hold for
/// `duration` steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pause {
    pub delay: u32,
    pub duration: u32,
}

impl Pause {
    #[inline]
    #[must_use]
    pub const fn new(delay: u32, duration: u32) -> Self {
        Self { delay, duration }
    }
}

/// Mode, interval and pause schedule of a ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickerConfig {
    #[serde(default, skip_serializing_if = "is_default_mode")]
    pub mode: TickMode,
    #[serde(default = "default_interval", skip_serializing_if = "is_default_interval")]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pauses: Vec<Pause>,
}

fn is_default_mode(mode: &TickMode) -> bool {
    mode.is_none()
}

fn default_interval() -> u32 {
    1
}

fn is_default_interval(interval: &u32) -> bool {
    *interval == 1
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            mode: TickMode::None,
            interval: 1,
            pauses: Vec::new(),
        }
    }
}

impl TickerConfig {
    /// Builder: set the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: TickMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder: set the interval (clamped to at least 1).
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Builder: append a pause.
    #[must_use]
    pub fn with_pause(mut self, delay: u32, duration: u32) -> Self {
        self.pauses.push(Pause::new(delay, duration));
        self
    }

    /// Whether every field is at its default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
