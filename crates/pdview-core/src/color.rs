//! RGB colours carried by label widgets.
//!
//! Pd stores IEM GUI colours as `#rrggbb` symbols. Anything else at a colour
//! position is either a legacy numeric colour (left at the default by the
//! extractor) or malformed, in which case [`parse_hex_color`] substitutes
//! [`Rgb::FALLBACK`] and logs a warning.

use std::fmt;

/// An 8-bit-per-channel RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Default label background (light gray).
    pub const LABEL_BACKGROUND: Self = Self::new(224, 224, 224);

    /// Default label text colour (black).
    pub const LABEL_TEXT: Self = Self::new(0, 0, 0);

    /// Neutral gray substituted for malformed colour tokens.
    pub const FALLBACK: Self = Self::new(128, 128, 128);

    /// Creates a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a strict `#rrggbb` token.
    ///
    /// Returns `None` unless the token is exactly seven bytes: `#` followed by
    /// six hex digits (either case).
    ///
    /// ```rust
    /// use pdview_core::Rgb;
    ///
    /// assert_eq!(Rgb::from_hex("#ff0400"), Some(Rgb::new(255, 4, 0)));
    /// assert_eq!(Rgb::from_hex("ff0400"), None);
    /// assert_eq!(Rgb::from_hex("#ff04"), None);
    /// ```
    pub fn from_hex(token: &str) -> Option<Self> {
        let digits = token.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parses a `#rrggbb` token, falling back to [`Rgb::FALLBACK`] on malformed
/// input. Never fails.
pub fn parse_hex_color(token: &str) -> Rgb {
    match Rgb::from_hex(token) {
        Some(color) => color,
        None => {
            tracing::warn!("invalid hex colour '{token}', using fallback gray");
            Rgb::FALLBACK
        }
    }
}
