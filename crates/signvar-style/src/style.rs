#![forbid(unsafe_code)]

//! Running text style: a colour plus a set of active formats.
//!
//! # Invariants
//!
//! 1. Selecting a colour clears every active format (display semantics).
//! 2. A reset returns to the caller's base style, never to a hard-coded one.
//! 3. Format codes are additive; there is no code that removes one format.

use crate::color::ChatColor;

/// The escape marker that introduces a style code.
pub const ESCAPE: char = '\u{00A7}';

bitflags::bitflags! {
    /// Active text formats.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct FormatFlags: u8 {
        const OBFUSCATED    = 0b0000_0001;
        const BOLD          = 0b0000_0010;
        const STRIKETHROUGH = 0b0000_0100;
        const UNDERLINE     = 0b0000_1000;
        const ITALIC        = 0b0001_0000;
    }
}

impl FormatFlags {
    /// Format selected by a code character (`k l m n o`).
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            'k' => Some(Self::OBFUSCATED),
            'l' => Some(Self::BOLD),
            'm' => Some(Self::STRIKETHROUGH),
            'n' => Some(Self::UNDERLINE),
            'o' => Some(Self::ITALIC),
            _ => None,
        }
    }

    /// Code characters for every set flag, in stable bit order.
    pub fn codes(self) -> impl Iterator<Item = char> {
        const TABLE: [(FormatFlags, char); 5] = [
            (FormatFlags::OBFUSCATED, 'k'),
            (FormatFlags::BOLD, 'l'),
            (FormatFlags::STRIKETHROUGH, 'm'),
            (FormatFlags::UNDERLINE, 'n'),
            (FormatFlags::ITALIC, 'o'),
        ];
        TABLE
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, code)| code)
    }
}

/// A single decoded style code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleCode {
    Color(ChatColor),
    Format(FormatFlags),
    Reset,
}

impl StyleCode {
    /// Decode the character that follows an escape marker.
    #[must_use]
    pub fn from_char(code: char) -> Option<Self> {
        if let Some(color) = ChatColor::from_code(code) {
            return Some(Self::Color(color));
        }
        if let Some(format) = FormatFlags::from_code(code) {
            return Some(Self::Format(format));
        }
        matches!(code, 'r' | 'R').then_some(Self::Reset)
    }

    /// The lowercase code character.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::Color(color) => color.code(),
            Self::Format(format) => format.codes().next().unwrap_or('r'),
            Self::Reset => 'r',
        }
    }
}

/// Colour + active formats carried by every styled character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub color: ChatColor,
    pub formats: FormatFlags,
}

impl Style {
    /// Plain style in the given colour.
    #[inline]
    #[must_use]
    pub const fn new(color: ChatColor) -> Self {
        Self {
            color,
            formats: FormatFlags::empty(),
        }
    }

    /// Builder: add formats.
    #[inline]
    #[must_use]
    pub fn with_formats(mut self, formats: FormatFlags) -> Self {
        self.formats |= formats;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_bold(self) -> bool {
        self.formats.contains(FormatFlags::BOLD)
    }

    /// Apply one code on top of this style. `base` is what a reset returns to.
    #[must_use]
    pub fn apply(self, code: StyleCode, base: Style) -> Style {
        match code {
            StyleCode::Color(color) => Style::new(color),
            StyleCode::Format(format) => self.with_formats(format),
            StyleCode::Reset => base,
        }
    }

    /// Append the codes that turn `from` into `self` onto `out`.
    ///
    /// Emits nothing when the styles are equal. A colour change emits one code
    /// plus the formats to re-enable; a lost format forces a reset to `base`
    /// first.
    pub fn write_transition(self, from: Style, base: Style, out: &mut String) {
        if self == from {
            return;
        }
        let mut current = from;
        if self.color != current.color {
            if self == Style::new(base.color) && base.formats.is_empty() {
                push_code(out, 'r');
                return;
            }
            push_code(out, self.color.code());
            current = Style::new(self.color);
        } else if !self.formats.contains(current.formats) {
            push_code(out, 'r');
            current = base;
            if current.color != self.color || !self.formats.contains(current.formats) {
                push_code(out, self.color.code());
                current = Style::new(self.color);
            }
        }
        for code in (self.formats - current.formats).codes() {
            push_code(out, code);
        }
    }

    /// Append codes that set `self` from any running style.
    pub fn write_full(self, out: &mut String) {
        push_code(out, self.color.code());
        for code in self.formats.codes() {
            push_code(out, code);
        }
    }
}

#[inline]
fn push_code(out: &mut String, code: char) {
    out.push(ESCAPE);
    out.push(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(codes: &str, start: Style, base: Style) -> Style {
        let mut style = start;
        let mut chars = codes.chars();
        while let Some(ch) = chars.next() {
            assert_eq!(ch, ESCAPE);
            let code = chars.next().expect("code follows escape");
            style = style.apply(StyleCode::from_char(code).expect("valid code"), base);
        }
        style
    }

    #[test]
    fn colour_code_clears_formats() {
        let bold = Style::new(ChatColor::Red).with_formats(FormatFlags::BOLD);
        let next = bold.apply(StyleCode::Color(ChatColor::Blue), Style::default());
        assert_eq!(next, Style::new(ChatColor::Blue));
    }

    #[test]
    fn full_codes_ignore_running_style() {
        let target = Style::new(ChatColor::Aqua).with_formats(FormatFlags::BOLD | FormatFlags::ITALIC);
        let mut out = String::new();
        target.write_full(&mut out);
        assert_eq!(out, "\u{00A7}b\u{00A7}l\u{00A7}o");
        let from = Style::new(ChatColor::Red).with_formats(FormatFlags::UNDERLINE);
        assert_eq!(replay(&out, from, Style::default()), target);
    }

    #[test]
    fn reset_returns_to_base() {
        let base = Style::new(ChatColor::White);
        let styled = Style::new(ChatColor::Red).with_formats(FormatFlags::ITALIC);
        assert_eq!(styled.apply(StyleCode::Reset, base), base);
    }

    #[test]
    fn decode_covers_all_code_kinds() {
        assert_eq!(
            StyleCode::from_char('a'),
            Some(StyleCode::Color(ChatColor::Green))
        );
        assert_eq!(
            StyleCode::from_char('L'),
            Some(StyleCode::Format(FormatFlags::BOLD))
        );
        assert_eq!(StyleCode::from_char('r'), Some(StyleCode::Reset));
        assert_eq!(StyleCode::from_char('z'), None);
    }

    #[test]
    fn transition_is_empty_for_equal_styles() {
        let mut out = String::new();
        let s = Style::new(ChatColor::Gold);
        s.write_transition(s, Style::default(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn adding_a_format_emits_only_that_format() {
        let mut out = String::new();
        let from = Style::new(ChatColor::Red);
        let to = from.with_formats(FormatFlags::BOLD);
        to.write_transition(from, Style::default(), &mut out);
        assert_eq!(out, "\u{00A7}l");
    }

    #[test]
    fn dropping_a_format_resets_then_restores() {
        let base = Style::default();
        let from = Style::new(ChatColor::Red).with_formats(FormatFlags::BOLD | FormatFlags::ITALIC);
        let to = Style::new(ChatColor::Red).with_formats(FormatFlags::ITALIC);
        let mut out = String::new();
        to.write_transition(from, base, &mut out);
        assert_eq!(replay(&out, from, base), to);
    }

    #[test]
    fn every_transition_replays_exactly() {
        let base = Style::new(ChatColor::Black);
        let samples = [
            Style::default(),
            Style::new(ChatColor::Red),
            Style::new(ChatColor::Red).with_formats(FormatFlags::BOLD),
            Style::new(ChatColor::Black).with_formats(FormatFlags::UNDERLINE),
            Style::new(ChatColor::Aqua).with_formats(FormatFlags::all()),
        ];
        for from in samples {
            for to in samples {
                let mut out = String::new();
                to.write_transition(from, base, &mut out);
                assert_eq!(replay(&out, from, base), to, "{from:?} -> {to:?}");
            }
        }
    }
}
