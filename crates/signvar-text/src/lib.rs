#![forbid(unsafe_code)]

//! Styled text for fixed-width sign displays.
//!
//! - [`StyledChar`] / [`StyledText`]: characters carrying colour, formats and
//!   a measured pixel width, with escape-code parse and encode.
//! - [`FormatMatcher`]: the `%name%` reference scanner used by formatted values.
//! - [`width`]: the display-font glyph width table.

pub mod format;
pub mod styled;
pub mod width;

pub use format::{FormatMatcher, FormatPiece, FormatToken, placeholder, tokenize};
pub use styled::{StyledChar, StyledText};
pub use width::glyph_width;
