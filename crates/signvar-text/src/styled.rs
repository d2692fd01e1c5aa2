#![forbid(unsafe_code)]

//! Styled characters and sequences.
//!
//! # Design
//!
//! Every glyph carries the full running style it was decoded with, so slicing
//! and truncation never lose colour or format state. Escape codes only exist in
//! the encoded string form; [`StyledText::parse`] decodes them and
//! [`StyledText::encode`] re-emits the minimal code sequence.
//!
//! # Invariants
//!
//! 1. [`StyledChar::width`] is a pure function of the character and its style.
//! 2. `parse(encode(t, s), s)` yields the same glyphs, styles and widths as `t`
//!    for any `t` built by this crate, including literal escape glyphs
//!    followed by code characters.
//! 3. Trailing style codes with no glyph after them survive as a zero-width
//!    marker so the encoded form keeps them.
//! 4. [`StyledText::width`] is additive over concatenation.

use std::fmt;
use std::ops::Range;

use signvar_style::{ESCAPE, Style, StyleCode};

use crate::width::glyph_width;

/// Sentinel character stored in zero-width style markers.
const MARKER: char = '\0';

/// One character plus the style it is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyledChar {
    ch: char,
    style: Style,
}

impl StyledChar {
    /// A visible glyph.
    #[inline]
    #[must_use]
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }

    /// A zero-width marker that only carries style.
    #[inline]
    #[must_use]
    pub const fn marker(style: Style) -> Self {
        Self { ch: MARKER, style }
    }

    /// A space rendered in `self`'s style, used for padding and blinking.
    #[inline]
    #[must_use]
    pub const fn as_space(self) -> Self {
        Self::new(' ', self.style)
    }

    #[inline]
    #[must_use]
    pub const fn ch(self) -> char {
        self.ch
    }

    #[inline]
    #[must_use]
    pub const fn style(self) -> Style {
        self.style
    }

    #[inline]
    #[must_use]
    pub const fn is_marker(self) -> bool {
        self.ch == MARKER
    }

    /// Rendered pixel width.
    ///
    /// Zero for markers; otherwise glyph width plus the inter-glyph gap, one
    /// more column when bold, one more when the glyph is a space.
    #[must_use]
    pub fn width(self) -> u32 {
        if self.is_marker() {
            return 0;
        }
        let mut width = glyph_width(self.ch) + 1;
        if self.style.is_bold() {
            width += 1;
        }
        if self.ch == ' ' {
            width += 1;
        }
        width
    }
}

/// An ordered, mutable run of [`StyledChar`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StyledText {
    chars: Vec<StyledChar>,
}

impl StyledText {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            chars: Vec::with_capacity(capacity),
        }
    }

    /// Decode `raw`, starting in `start`. Reset codes return to `start`.
    ///
    /// An escape marker followed by an unknown code (or by nothing) is kept as
    /// a literal character.
    #[must_use]
    pub fn parse(raw: &str, start: Style) -> Self {
        let mut text = Self::with_capacity(raw.len());
        text.push_raw(raw, start, start);
        text
    }

    /// Decode `raw` and append it, continuing from `running`.
    ///
    /// Returns the style in effect after the last code.
    pub fn push_raw(&mut self, raw: &str, running: Style, base: Style) -> Style {
        let mut style = running;
        let mut pending = false;
        let mut chars = raw.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == ESCAPE
                && let Some(code) = chars.peek().copied().and_then(StyleCode::from_char)
            {
                chars.next();
                style = style.apply(code, base);
                pending = true;
                continue;
            }
            self.chars.push(StyledChar::new(ch, style));
            pending = false;
        }
        if pending {
            self.chars.push(StyledChar::marker(style));
        }
        style
    }

    /// Encode with minimal escape codes, relative to `start`.
    #[must_use]
    pub fn encode(&self, start: Style) -> String {
        let mut out = String::with_capacity(self.chars.len() + 8);
        let mut running = start;
        for c in &self.chars {
            c.style.write_transition(running, start, &mut out);
            running = c.style;
            if c.is_marker() {
                continue;
            }
            // a literal escape must not pair up with a code-like glyph
            if out.ends_with(ESCAPE) && StyleCode::from_char(c.ch).is_some() {
                c.style.write_full(&mut out);
            }
            out.push(c.ch);
        }
        out
    }

    /// Glyphs only, with every style code dropped.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.glyphs().map(StyledChar::ch).collect()
    }

    /// Iterate visible glyphs (markers skipped).
    pub fn glyphs(&self) -> impl Iterator<Item = StyledChar> + '_ {
        self.chars.iter().copied().filter(|c| !c.is_marker())
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, StyledChar> {
        self.chars.iter()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[StyledChar] {
        &self.chars
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<StyledChar> {
        self.chars.get(index).copied()
    }

    #[inline]
    pub fn push(&mut self, c: StyledChar) {
        self.chars.push(c);
    }

    #[inline]
    pub fn insert(&mut self, index: usize, c: StyledChar) {
        self.chars.insert(index, c);
    }

    pub fn append(&mut self, other: &StyledText) {
        self.chars.extend_from_slice(&other.chars);
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    /// Total pixel width. O(n); cache when iterating.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.chars.iter().map(|c| c.width()).sum()
    }

    /// Copy of `range`, clamped to the sequence.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> StyledText {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        Self {
            chars: self.chars[start..end].to_vec(),
        }
    }

    #[must_use]
    pub fn first_style(&self) -> Option<Style> {
        self.chars.first().map(|c| c.style)
    }

    #[must_use]
    pub fn last_style(&self) -> Option<Style> {
        self.chars.last().map(|c| c.style)
    }

    /// Longest prefix whose width does not exceed `limit`.
    #[must_use]
    pub fn truncated_to_width(&self, limit: u32) -> StyledText {
        let mut used = 0;
        let mut end = 0;
        for c in &self.chars {
            let w = c.width();
            if used + w > limit {
                break;
            }
            used += w;
            end += 1;
        }
        self.slice(0..end)
    }

    /// The sequence read from `offset`, wrapping cyclically.
    ///
    /// Positive offsets move content left; negative offsets move it right.
    #[must_use]
    pub fn rotated(&self, offset: isize) -> StyledText {
        let len = self.chars.len();
        if len == 0 {
            return self.clone();
        }
        let start = offset.rem_euclid(len as isize) as usize;
        let mut chars = Vec::with_capacity(len);
        chars.extend_from_slice(&self.chars[start..]);
        chars.extend_from_slice(&self.chars[..start]);
        Self { chars }
    }

    /// Every glyph replaced by a space in the same style.
    #[must_use]
    pub fn blanked(&self) -> StyledText {
        Self {
            chars: self
                .chars
                .iter()
                .map(|c| if c.is_marker() { *c } else { c.as_space() })
                .collect(),
        }
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(Style::default()))
    }
}

impl From<&str> for StyledText {
    fn from(raw: &str) -> Self {
        Self::parse(raw, Style::default())
    }
}

impl FromIterator<StyledChar> for StyledText {
    fn from_iter<I: IntoIterator<Item = StyledChar>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}

impl Extend<StyledChar> for StyledText {
    fn extend<I: IntoIterator<Item = StyledChar>>(&mut self, iter: I) {
        self.chars.extend(iter);
    }
}

impl<'a> IntoIterator for &'a StyledText {
    type Item = &'a StyledChar;
    type IntoIter = std::slice::Iter<'a, StyledChar>;

    fn into_iter(self) -> Self::IntoIter {
        self.chars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signvar_style::{ChatColor, FormatFlags};

    fn red() -> Style {
        Style::new(ChatColor::Red)
    }

    #[test]
    fn width_rules() {
        let plain = Style::default();
        let bold = plain.with_formats(FormatFlags::BOLD);
        assert_eq!(StyledChar::new('a', plain).width(), 6);
        assert_eq!(StyledChar::new('a', bold).width(), 7);
        assert_eq!(StyledChar::new(' ', plain).width(), 4);
        assert_eq!(StyledChar::new(' ', bold).width(), 5);
        assert_eq!(StyledChar::marker(bold).width(), 0);
    }

    #[test]
    fn as_space_keeps_style() {
        let c = StyledChar::new('x', red().with_formats(FormatFlags::BOLD));
        let space = c.as_space();
        assert_eq!(space.ch(), ' ');
        assert_eq!(space.style(), c.style());
        assert_eq!(space.width(), StyledChar::new(' ', c.style()).width());
    }

    #[test]
    fn parse_applies_running_style() {
        let text = StyledText::parse("a\u{00A7}cb\u{00A7}lc", Style::default());
        let styles: Vec<Style> = text.iter().map(|c| c.style()).collect();
        assert_eq!(
            styles,
            vec![
                Style::default(),
                red(),
                red().with_formats(FormatFlags::BOLD)
            ]
        );
        assert_eq!(text.plain_text(), "abc");
    }

    #[test]
    fn reset_returns_to_start_style() {
        let start = Style::new(ChatColor::Blue);
        let text = StyledText::parse("\u{00A7}cx\u{00A7}ry", start);
        assert_eq!(text.get(1).map(StyledChar::style), Some(start));
    }

    #[test]
    fn trailing_codes_become_marker() {
        let text = StyledText::parse("hi\u{00A7}c", Style::default());
        assert_eq!(text.len(), 3);
        assert!(text.get(2).is_some_and(StyledChar::is_marker));
        assert_eq!(text.width(), StyledText::from("hi").width());
        assert_eq!(text.encode(Style::default()), "hi\u{00A7}c");
    }

    #[test]
    fn unknown_code_is_literal() {
        let text = StyledText::parse("\u{00A7}zq\u{00A7}", Style::default());
        assert_eq!(text.plain_text(), "\u{00A7}zq\u{00A7}");
    }

    #[test]
    fn encode_is_minimal() {
        let text = StyledText::parse("\u{00A7}ca\u{00A7}cb\u{00A7}c\u{00A7}lc", Style::default());
        assert_eq!(text.encode(Style::default()), "\u{00A7}cab\u{00A7}lc");
    }

    #[test]
    fn encode_then_parse_round_trips() {
        let raw = "\u{00A7}9Hello \u{00A7}l\u{00A7}nWorld\u{00A7}r!\u{00A7}6";
        let text = StyledText::parse(raw, Style::default());
        let again = StyledText::parse(&text.encode(Style::default()), Style::default());
        assert_eq!(text, again);
    }

    #[test]
    fn literal_escape_before_code_glyph_round_trips() {
        let mut text = StyledText::parse("a\u{00A7}", Style::default());
        text.append(&StyledText::parse("cb", Style::default()));
        assert_eq!(text.plain_text(), "a\u{00A7}cb");
        let again = StyledText::parse(&text.encode(Style::default()), Style::default());
        assert_eq!(again.plain_text(), "a\u{00A7}cb");
        assert_eq!(again, text);

        let bold = Style::new(ChatColor::Red).with_formats(FormatFlags::BOLD);
        let text: StyledText = ['\u{00A7}', '\u{00A7}', 'L', 'r']
            .into_iter()
            .map(|ch| StyledChar::new(ch, bold))
            .collect();
        let again = StyledText::parse(&text.encode(Style::default()), Style::default());
        assert_eq!(again, text);
    }

    #[test]
    fn rotation_wraps_both_ways() {
        let text = StyledText::from("abcd");
        assert_eq!(text.rotated(1).plain_text(), "bcda");
        assert_eq!(text.rotated(-1).plain_text(), "dabc");
        assert_eq!(text.rotated(4).plain_text(), "abcd");
        assert!(StyledText::new().rotated(3).is_empty());
    }

    #[test]
    fn blanked_keeps_length_and_style() {
        let text = StyledText::parse("\u{00A7}cab", Style::default());
        let blank = text.blanked();
        assert_eq!(blank.len(), text.len());
        assert_eq!(blank.plain_text(), "  ");
        assert!(blank.iter().all(|c| c.style() == red()));
    }

    #[test]
    fn truncation_respects_limit() {
        let text = StyledText::from("aaaa");
        assert_eq!(text.truncated_to_width(12).len(), 2);
        assert_eq!(text.truncated_to_width(11).len(), 1);
        assert_eq!(text.truncated_to_width(0).len(), 0);
    }

    #[test]
    fn slice_is_clamped() {
        let text = StyledText::from("abc");
        assert_eq!(text.slice(1..10).plain_text(), "bc");
        assert!(text.slice(5..9).is_empty());
    }

    #[test]
    fn width_is_additive() {
        let mut a = StyledText::from("left");
        let b = StyledText::parse("\u{00A7}lright", Style::default());
        let expected = a.width() + b.width();
        a.append(&b);
        assert_eq!(a.width(), expected);
    }
}
