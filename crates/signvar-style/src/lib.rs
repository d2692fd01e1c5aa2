#![forbid(unsafe_code)]

//! Style primitives for signvar: the 16-colour palette, format flags and the
//! escape-coded style state machine shared by parsing and encoding.

pub mod color;
pub mod style;

pub use color::ChatColor;
pub use style::{ESCAPE, FormatFlags, Style, StyleCode};
