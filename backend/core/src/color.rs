//! 8-bit ARGB colors and the alpha math used to flatten layered backgrounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_argb(0, 255, 255, 255);
    pub const BLACK: Color = Color::from_argb(255, 0, 0, 0);
    pub const WHITE: Color = Color::from_argb(255, 255, 255, 255);
    pub const RED: Color = Color::from_argb(255, 255, 0, 0);
    pub const GREEN: Color = Color::from_argb(255, 0, 128, 0);
    pub const BLUE: Color = Color::from_argb(255, 0, 0, 255);
    pub const GRAY: Color = Color::from_argb(255, 128, 128, 128);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(255, r, g, b)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == u8::MAX
    }

    /// Scales alpha by `opacity`, clamped to `0.0..=1.0`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
        Self {
            a: to_channel(f64::from(self.a) * opacity),
            ..self
        }
    }

    /// Source-over composite of `self` painted on top of `background`.
    pub fn flatten_onto(self, background: Color) -> Self {
        let fa = f64::from(self.a) / 255.0;
        let ba = f64::from(background.a) / 255.0;
        let out_a = fa + ba * (1.0 - fa);
        if out_a <= 0.0 {
            return Color::TRANSPARENT;
        }

        let blend = |f: u8, b: u8| {
            (f64::from(f) * fa + f64::from(b) * ba * (1.0 - fa)) / out_a
        };

        Self {
            a: to_channel(out_a * 255.0),
            r: to_channel(blend(self.r, background.r)),
            g: to_channel(blend(self.g, background.g)),
            b: to_channel(blend(self.b, background.b)),
        }
    }

    /// Looks up a well-known color name (case-insensitive).
    pub fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "transparent" => Color::TRANSPARENT,
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::RED,
            "green" => Color::GREEN,
            "lime" => Color::from_rgb(0, 255, 0),
            "blue" => Color::BLUE,
            "gray" | "grey" => Color::GRAY,
            "yellow" => Color::from_rgb(255, 255, 0),
            "orange" => Color::from_rgb(255, 165, 0),
            _ => return None,
        };
        Some(color)
    }
}

fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Formats as `#AARRGGBB`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

/// Error returned when a string is neither `#AARRGGBB`, `#RRGGBB`, nor a known name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid color")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some(hex) = trimmed.strip_prefix('#') else {
            return Color::named(trimmed).ok_or_else(|| ParseColorError(s.to_string()));
        };

        let parse = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| ParseColorError(s.to_string()))
        };

        match hex.len() {
            8 => Ok(Color::from_argb(parse(0..2)?, parse(2..4)?, parse(4..6)?, parse(6..8)?)),
            6 => Ok(Color::from_rgb(parse(0..2)?, parse(2..4)?, parse(4..6)?)),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_foreground_wins() {
        assert_eq!(Color::RED.flatten_onto(Color::BLUE), Color::RED);
    }

    #[test]
    fn test_transparent_foreground_keeps_background() {
        assert_eq!(Color::TRANSPARENT.flatten_onto(Color::BLUE), Color::BLUE);
    }

    #[test]
    fn test_half_white_over_black_is_gray() {
        let half_white = Color::from_argb(128, 255, 255, 255);
        let flattened = half_white.flatten_onto(Color::BLACK);
        assert_eq!(flattened, Color::from_argb(255, 128, 128, 128));
    }

    #[test]
    fn test_both_transparent() {
        let out = Color::TRANSPARENT.flatten_onto(Color::from_argb(0, 1, 2, 3));
        assert_eq!(out.a, 0);
    }

    #[test]
    fn test_with_opacity_clamps() {
        assert_eq!(Color::RED.with_opacity(0.5).a, 128);
        assert_eq!(Color::RED.with_opacity(2.0).a, 255);
        assert_eq!(Color::RED.with_opacity(-1.0).a, 0);
        assert_eq!(Color::RED.with_opacity(f64::NAN).a, 0);
    }

    #[test]
    fn test_parse_and_display() {
        let c: Color = "#80FF0000".parse().unwrap();
        assert_eq!(c, Color::from_argb(0x80, 0xFF, 0, 0));
        assert_eq!(c.to_string(), "#80FF0000");

        let c: Color = "#00FF00".parse().unwrap();
        assert!(c.is_opaque());

        assert_eq!("Blue".parse::<Color>().unwrap(), Color::BLUE);
        assert!("#XYZ".parse::<Color>().is_err());
        assert!("chartreuse-ish".parse::<Color>().is_err());
    }
}
