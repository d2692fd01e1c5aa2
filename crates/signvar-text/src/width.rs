#![forbid(unsafe_code)]

//! Pixel widths of display-font glyphs.
//!
//! Widths here are *glyph* widths: the inked columns of a character, without
//! the one-column gap the display inserts after every glyph. The gap, the bold
//! offset and the extra space advance are added by
//! [`StyledChar::width`](crate::StyledChar::width).

use unicode_width::UnicodeWidthChar;

/// Glyph width used for characters missing from the table.
pub const DEFAULT_GLYPH_WIDTH: u32 = 5;

/// Glyph widths for printable ASCII (`' '..='~'`), indexed by `byte - 0x20`.
const ASCII_WIDTHS: [u8; 95] = [
    2, 1, 3, 5, 5, 5, 5, 1, 3, 3, 3, 5, 1, 5, 1, 5, // ' ' .. '/'
    5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 1, 1, 4, 5, 4, 5, // '0' .. '?'
    6, 5, 5, 5, 5, 5, 5, 5, 5, 3, 5, 5, 5, 5, 5, 5, // '@' .. 'O'
    5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 3, 5, 3, 5, 5, // 'P' .. '_'
    2, 5, 5, 5, 5, 5, 4, 5, 5, 1, 5, 4, 2, 5, 5, 5, // '`' .. 'o'
    5, 5, 5, 5, 3, 5, 5, 5, 5, 5, 5, 3, 1, 3, 6, // 'p' .. '~'
];

/// Base glyph width of `ch`.
///
/// East-Asian wide characters take two default cells.
#[must_use]
pub fn glyph_width(ch: char) -> u32 {
    if (' '..='~').contains(&ch) {
        return u32::from(ASCII_WIDTHS[ch as usize - 0x20]);
    }
    match ch.width() {
        Some(2) => DEFAULT_GLYPH_WIDTH * 2,
        _ => DEFAULT_GLYPH_WIDTH,
    }
}
