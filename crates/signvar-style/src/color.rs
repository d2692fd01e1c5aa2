#![forbid(unsafe_code)]

//! The 16-colour palette understood by sign displays.
//!
//! Each colour is selected in text by the escape marker followed by a single
//! hexadecimal digit (`§0` .. `§f`). Codes are case-insensitive on input and
//! always emitted lowercase.

/// One of the 16 display colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum ChatColor {
    #[default]
    Black = 0,
    DarkBlue = 1,
    DarkGreen = 2,
    DarkAqua = 3,
    DarkRed = 4,
    DarkPurple = 5,
    Gold = 6,
    Gray = 7,
    DarkGray = 8,
    Blue = 9,
    Green = 10,
    Aqua = 11,
    Red = 12,
    LightPurple = 13,
    Yellow = 14,
    White = 15,
}

impl ChatColor {
    /// All colours in code order.
    pub const ALL: [Self; 16] = [
        Self::Black,
        Self::DarkBlue,
        Self::DarkGreen,
        Self::DarkAqua,
        Self::DarkRed,
        Self::DarkPurple,
        Self::Gold,
        Self::Gray,
        Self::DarkGray,
        Self::Blue,
        Self::Green,
        Self::Aqua,
        Self::Red,
        Self::LightPurple,
        Self::Yellow,
        Self::White,
    ];

    /// Colour for a palette index, `None` above 15.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 16 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Colour selected by a code character (`'0'..='9'`, `'a'..='f'`).
    #[inline]
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        let digit = code.to_digit(16)?;
        Self::from_index(digit as u8)
    }

    /// The lowercase code character emitted after the escape marker.
    #[inline]
    #[must_use]
    pub fn code(self) -> char {
        // Index is always < 16, so this cannot fail.
        char::from_digit(self as u32, 16).unwrap_or('0')
    }

    /// Palette index (0..16).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}
