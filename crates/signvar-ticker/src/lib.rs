#![forbid(unsafe_code)]

//! Ticker animation for signvar entries.
//!
//! - [`TickerConfig`]: mode, interval and pause schedule (the persisted form).
//! - [`TickerState`]: the text-free state machine advanced by the clock.
//! - [`TickerText`]: an entry's source text and its rendered view.
//! - [`Ticker`]: the control surface every ticker variant exposes.
//!
//! # Invariants
//!
//! 1. A state in [`TickMode::None`] never changes on [`TickerState::tick`].
//! 2. Scrolling at rest (offset 0 modulo length) renders the source verbatim.
//! 3. A blink frame has the same character count and styles as the source.
//! 4. Pause evaluation always terminates, even for all-zero schedules.

pub mod config;
pub mod state;
pub mod text;

pub use config::{Pause, TickMode, TickerConfig};
pub use state::{Phase, Ticker, TickerState};
pub use text::TickerText;
