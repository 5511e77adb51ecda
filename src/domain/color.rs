// SPDX-License-Identifier: MIT OR Apache-2.0

//! RGB color values.

use std::fmt;
use std::str::FromStr;

/// An opaque 24-bit RGB color.
///
/// Colors parse from `#rrggbb`, `0xrrggbb`, a decimal packed RGB integer, or one of the named
/// constants (case-insensitive, `_`/`-` ignored). They always display as lowercase `#rrggbb`.
///
/// # Examples
///
/// ```
/// use hexsettings::domain::Color;
///
/// let c: Color = "#FF8000".parse().unwrap();
/// assert_eq!(c, Color::new(255, 128, 0));
/// assert_eq!(c.to_string(), "#ff8000");
/// assert_eq!("dark_gray".parse::<Color>().unwrap(), Color::DARK_GRAY);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
}

impl Color {
    /// White.
    pub const WHITE: Color = Color::new(255, 255, 255);
    /// Light gray.
    pub const LIGHT_GRAY: Color = Color::new(192, 192, 192);
    /// Gray.
    pub const GRAY: Color = Color::new(128, 128, 128);
    /// Dark gray.
    pub const DARK_GRAY: Color = Color::new(64, 64, 64);
    /// Black.
    pub const BLACK: Color = Color::new(0, 0, 0);
    /// Red.
    pub const RED: Color = Color::new(255, 0, 0);
    /// Pink.
    pub const PINK: Color = Color::new(255, 175, 175);
    /// Orange.
    pub const ORANGE: Color = Color::new(255, 200, 0);
    /// Yellow.
    pub const YELLOW: Color = Color::new(255, 255, 0);
    /// Green.
    pub const GREEN: Color = Color::new(0, 255, 0);
    /// Magenta.
    pub const MAGENTA: Color = Color::new(255, 0, 255);
    /// Cyan.
    pub const CYAN: Color = Color::new(0, 255, 255);
    /// Blue.
    pub const BLUE: Color = Color::new(0, 0, 255);

    const NAMED: [(&'static str, Color); 13] = [
        ("white", Color::WHITE),
        ("lightgray", Color::LIGHT_GRAY),
        ("gray", Color::GRAY),
        ("darkgray", Color::DARK_GRAY),
        ("black", Color::BLACK),
        ("red", Color::RED),
        ("pink", Color::PINK),
        ("orange", Color::ORANGE),
        ("yellow", Color::YELLOW),
        ("green", Color::GREEN),
        ("magenta", Color::MAGENTA),
        ("cyan", Color::CYAN),
        ("blue", Color::BLUE),
    ];

    /// Creates a color from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Creates a color from a packed `0xRRGGBB` integer. Bits above 24 are ignored.
    pub const fn from_rgb(rgb: u32) -> Self {
        Color::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Returns the packed `0xRRGGBB` integer.
    pub const fn rgb(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Looks up a named constant.
    pub fn named(name: &str) -> Option<Color> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::NAMED
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
    }
}

/// Error returned when a string is not a recognizable color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a color", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseColorError(s.to_string());

        let packed = if let Some(hex) = s.strip_prefix('#') {
            Some(hex)
                .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
                .and_then(|h| u32::from_str_radix(h, 16).ok())
        } else if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex)
                .filter(|h| !h.is_empty() && h.chars().all(|c| c.is_ascii_hexdigit()))
                .and_then(|h| u32::from_str_radix(h, 16).ok())
        } else if s.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            s.parse::<u32>().ok()
        } else {
            return Color::named(s).ok_or_else(err);
        };

        match packed {
            Some(rgb) if rgb <= 0xFF_FFFF => Ok(Color::from_rgb(rgb)),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
