//! `#RRGGBB` colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{FrameError, FrameResult};

/// An opaque RGB color written as `#` followed by six hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl HexColor {
    /// White, the default panel background.
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    /// Black, the default text color.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Build a color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color, accepting exactly `#` followed by six hex digits.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidColor`] for anything else.
    pub fn parse(value: &str) -> FrameResult<Self> {
        let invalid = || FrameError::InvalidColor(value.to_string());
        let digits = value.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// RGBA bytes with the given alpha.
    #[must_use]
    pub const fn to_rgba(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = FrameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(HexColor::parse("#1a2b3c").expect("valid"), HexColor::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(HexColor::parse("#FFFFFF").expect("valid"), HexColor::WHITE);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["#ZZZZZZ", "123456", "#12345", "#1234567", "", "#", " #123456", "#12345g"] {
            assert!(
                matches!(HexColor::parse(bad), Err(FrameError::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_roundtrip() {
        let c = HexColor::rgb(1, 170, 255);
        assert_eq!(c.to_string(), "#01AAFF");
        assert_eq!(c.to_string().parse::<HexColor>().expect("reparse"), c);
    }

    #[test]
    fn test_serde_rejects_bad_color() {
        let err = serde_json::from_str::<HexColor>("\"red\"");
        assert!(err.is_err());
        let ok: HexColor = serde_json::from_str("\"#000000\"").expect("valid");
        assert_eq!(ok, HexColor::BLACK);
    }
}
