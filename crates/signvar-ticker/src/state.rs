#![forbid(unsafe_code)]

//! The per-ticker animation state machine.
//!
//! A [`TickerState`] holds settings and phase but no text: the same state can
//! drive several texts (the default entry and every viewer entry sharing it),
//! each rendered with [`TickerState::render`].
//!
//! # Phases
//!
//! ```text
//! Rest ──left()──▶ ScrollLeft(1) ──left()──▶ ScrollLeft(2) …
//!   │                  │
//!   │               right() resets, then ScrollRight(1)
//!   └──blink()──▶ Blink(blanked) ──blink()──▶ Blink(shown) …
//! ```
//!
//! Switching between scroll directions or between scrolling and blinking
//! restarts from rest before applying the step.
//!
//! # Pause schedule
//!
//! Every step that is due (once per `interval` ticks) first consults the pause
//! cursor. The cursor counts `delay` free steps, then `duration` held steps,
//! then moves to the next pause, cycling. If it passes over the whole list
//! twice in one evaluation without settling, the step runs unpaused.

use signvar_text::StyledText;

use crate::config::{Pause, TickMode, TickerConfig};

/// Current animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Rest,
    ScrollLeft(isize),
    ScrollRight(isize),
    Blink { blanked: bool },
}

/// Position within the pause schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
struct PauseCursor {
    index: usize,
    delay: u32,
    duration: u32,
}

impl PauseCursor {
    /// Advance one step. Returns whether the step is held.
    fn step(&mut self, pauses: &[Pause]) -> bool {
        if pauses.is_empty() {
            return false;
        }
        if self.index >= pauses.len() {
            *self = Self::default();
        }
        let limit = pauses.len() * 2;
        for _ in 0..limit {
            let pause = pauses[self.index];
            if self.delay < pause.delay {
                self.delay += 1;
                return false;
            }
            if self.duration < pause.duration {
                self.duration += 1;
                return true;
            }
            self.index = (self.index + 1) % pauses.len();
            self.delay = 0;
            self.duration = 0;
        }
        tracing::warn!(
            pauses = pauses.len(),
            "pause schedule made no progress, running unpaused"
        );
        false
    }
}

/// Settings plus phase of one ticker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickerState {
    config: TickerConfig,
    counter: u32,
    cursor: PauseCursor,
    phase: Phase,
}

impl TickerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: TickerConfig) -> Self {
        let mut state = Self::new();
        state.load_config(&config);
        state
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the state renders text verbatim.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.phase == Phase::Rest
    }

    /// Advance one clock tick. Returns whether the phase changed.
    pub fn tick(&mut self) -> bool {
        if self.config.mode.is_none() {
            return false;
        }
        self.counter += 1;
        if self.counter < self.config.interval {
            return false;
        }
        self.counter = 0;
        if self.cursor.step(&self.config.pauses) {
            return false;
        }
        match self.config.mode {
            TickMode::None => return false,
            TickMode::Left => self.step_left(),
            TickMode::Right => self.step_right(),
            TickMode::Blink => self.step_blink(),
        }
        true
    }

    /// Render `source` in the current phase.
    #[must_use]
    pub fn render(&self, source: &StyledText) -> StyledText {
        match self.phase {
            Phase::Rest | Phase::Blink { blanked: false } => source.clone(),
            Phase::ScrollLeft(offset) => source.rotated(offset),
            Phase::ScrollRight(offset) => source.rotated(offset.wrapping_neg()),
            Phase::Blink { blanked: true } => source.blanked(),
        }
    }

    fn step_left(&mut self) {
        self.phase = match self.phase {
            Phase::ScrollLeft(offset) => Phase::ScrollLeft(offset.wrapping_add(1)),
            _ => Phase::ScrollLeft(1),
        };
    }

    fn step_right(&mut self) {
        self.phase = match self.phase {
            Phase::ScrollRight(offset) => Phase::ScrollRight(offset.wrapping_add(1)),
            _ => Phase::ScrollRight(1),
        };
    }

    fn step_blink(&mut self) {
        self.phase = match self.phase {
            Phase::Blink { blanked } => Phase::Blink { blanked: !blanked },
            _ => Phase::Blink { blanked: true },
        };
    }
}

/// The public animation controls shared by every ticker variant.
pub trait Ticker {
    fn mode(&self) -> TickMode;
    fn set_mode(&mut self, mode: TickMode);
    fn interval(&self) -> u32;
    /// Steps run once every `interval` ticks; values below 1 become 1.
    fn set_interval(&mut self, interval: u32);
    fn pauses(&self) -> &[Pause];
    fn add_pause(&mut self, delay: u32, duration: u32);
    fn clear_pauses(&mut self);
    /// Scroll one character left.
    fn left(&mut self);
    /// Scroll one character right.
    fn right(&mut self);
    /// Toggle between text and blank frame.
    fn blink(&mut self);
    /// Return to rest and restart the pause schedule.
    fn reset(&mut self);

    fn config(&self) -> TickerConfig {
        TickerConfig {
            mode: self.mode(),
            interval: self.interval(),
            pauses: self.pauses().to_vec(),
        }
    }

    fn load_config(&mut self, config: &TickerConfig) {
        self.set_mode(config.mode);
        self.set_interval(config.interval);
        self.clear_pauses();
        for pause in &config.pauses {
            self.add_pause(pause.delay, pause.duration);
        }
    }
}

impl Ticker for TickerState {
    fn mode(&self) -> TickMode {
        self.config.mode
    }

    fn set_mode(&mut self, mode: TickMode) {
        if self.config.mode != mode {
            self.config.mode = mode;
            self.reset();
        }
    }

    fn interval(&self) -> u32 {
        self.config.interval
    }

    fn set_interval(&mut self, interval: u32) {
        self.config.interval = interval.max(1);
        self.counter = 0;
    }

    fn pauses(&self) -> &[Pause] {
        &self.config.pauses
    }

    fn add_pause(&mut self, delay: u32, duration: u32) {
        self.config.pauses.push(Pause::new(delay, duration));
    }

    fn clear_pauses(&mut self) {
        self.config.pauses.clear();
        self.cursor = PauseCursor::default();
    }

    fn left(&mut self) {
        self.step_left();
    }

    fn right(&mut self) {
        self.step_right();
    }

    fn blink(&mut self) {
        self.step_blink();
    }

    fn reset(&mut self) {
        self.phase = Phase::Rest;
        self.counter = 0;
        self.cursor = PauseCursor::default();
    }

    fn config(&self) -> TickerConfig {
        self.config.clone()
    }
}
