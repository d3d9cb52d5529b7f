use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Colour { red, green, blue }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    pub fn to_rgb_text(self) -> String {
        format!("{},{},{}", self.red, self.green, self.blue)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl From<[u8; 3]> for Colour {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Colour { red, green, blue }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Textual notation of a colour: `#rrggbb` or `r,g,b`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    #[default]
    Hex,
    Rgb,
}

impl Notation {
    /// Leading `#` means HEX, any comma means RGB.
    pub fn detect(text: &str) -> Option<Notation> {
        let text = text.trim();
        if text.starts_with('#') {
            Some(Notation::Hex)
        } else if text.contains(',') {
            Some(Notation::Rgb)
        } else {
            None
        }
    }

    pub fn format(self, colour: Colour) -> String {
        match self {
            Notation::Hex => colour.to_hex(),
            Notation::Rgb => colour.to_rgb_text(),
        }
    }

    /// Text of the zero colour in this notation, used for newly appended stops.
    pub fn zero(self) -> &'static str {
        match self {
            Notation::Hex => "#000000",
            Notation::Rgb => "0,0,0",
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Hex => f.write_str("HEX"),
            Notation::Rgb => f.write_str("RGB"),
        }
    }
}

/// Splits an optional leading `[pos]` prefix from a stop line.
///
/// Returns the prefix including both brackets, and the remainder. A line that
/// opens a bracket without closing it is a format error.
pub fn split_position_prefix(text: &str) -> Result<(Option<&str>, &str)> {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('[') {
        return Ok((None, text));
    }
    let close = trimmed
        .find(']')
        .ok_or_else(|| Error::format(text, "unterminated position prefix"))?;
    Ok((Some(&trimmed[..=close]), &trimmed[close + 1..]))
}

/// Parses the float inside a `[pos]` prefix. The value is taken verbatim, no
/// clamping, but it must be finite.
pub fn parse_position(prefix: &str) -> Result<f64> {
    let inner = prefix
        .strip_prefix('[')
        .and_then(|p| p.strip_suffix(']'))
        .ok_or_else(|| Error::format(prefix, "position prefix must look like [0.5]"))?;
    let position: f64 = inner
        .trim()
        .parse()
        .map_err(|e| Error::format(prefix, format!("invalid position: {}", e)))?;
    if !position.is_finite() {
        return Err(Error::format(prefix, "position must be finite"));
    }
    Ok(position)
}

/// Parses a colour in either notation. Any `[pos]` prefix is ignored.
pub fn parse(text: &str) -> Result<Colour> {
    let (_, rest) = split_position_prefix(text)?;
    let colour = rest.trim();
    match Notation::detect(colour) {
        Some(Notation::Hex) => parse_hex(colour),
        Some(Notation::Rgb) => parse_rgb(colour),
        None => Err(Error::format(text, "expected #RRGGBB or R,G,B")),
    }
}

fn parse_hex(text: &str) -> Result<Colour> {
    let digits = &text[1..];
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::format(text, "HEX colours need exactly 6 hex digits"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|e| Error::format(text, format!("invalid hex channel: {}", e)))
    };
    Ok(Colour::new(channel(0)?, channel(2)?, channel(4)?))
}

fn parse_rgb(text: &str) -> Result<Colour> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        return Err(Error::format(text, "RGB colours need exactly 3 channels"));
    }
    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        let part = part.trim();
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::format(text, format!("'{}' is not a channel value", part)));
        }
        *slot = part
            .parse()
            .map_err(|_| Error::format(text, format!("channel {} is outside 0..=255", part)))?;
    }
    Ok(Colour::from(channels))
}

/// Rewrites the colour part of `text` in `target` notation, keeping any
/// `[pos]` prefix as written. Text that is already in `target` notation, or
/// that cannot be parsed, comes back unchanged.
pub fn convert_notation(text: &str, target: Notation) -> String {
    let Ok((prefix, rest)) = split_position_prefix(text) else {
        return text.to_string();
    };
    if Notation::detect(rest) == Some(target) {
        return text.to_string();
    }
    match parse(rest) {
        Ok(colour) => format!("{}{}", prefix.unwrap_or(""), target.format(colour)),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_parse_both_notations() {
        assert_eq!(parse("#FF8000").unwrap(), Colour::new(255, 128, 0));
        assert_eq!(parse("#ff8000").unwrap(), Colour::new(255, 128, 0));
        assert_eq!(parse("255,128,0").unwrap(), Colour::new(255, 128, 0));
        assert_eq!(parse(" 1, 2 ,3 ").unwrap(), Colour::new(1, 2, 3));
    }

    #[test]
    fn test_parse_ignores_position_prefix() {
        assert_eq!(parse("[0.25]#00ff00").unwrap(), Colour::new(0, 255, 0));
        assert_eq!(parse("[1]0,0,255").unwrap(), Colour::new(0, 0, 255));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "", "#fff", "#12345", "#1234567", "#gg0000", "ff0000", "1,2", "1,2,3,4",
            "256,0,0", "-1,0,0", "a,b,c", "1,,3", "[0.5#000000",
        ] {
            assert!(
                matches!(parse(bad), Err(Error::Format { .. })),
                "expected format error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_serialisation() {
        let c = Colour::new(10, 0, 255);
        assert_eq!(c.to_hex(), "#0a00ff");
        assert_eq!(c.to_rgb_text(), "10,0,255");
        assert_eq!(Notation::Hex.zero(), "#000000");
        assert_eq!(Notation::Rgb.zero(), "0,0,0");
    }

    #[test]
    fn test_random_colours_survive_both_notations() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let c = Colour::new(rng.random(), rng.random(), rng.random());
            assert_eq!(parse(&c.to_hex()).unwrap().to_hex(), c.to_hex());
            assert_eq!(parse(&c.to_rgb_text()).unwrap().to_rgb_text(), c.to_rgb_text());
        }
    }

    #[test]
    fn test_convert_notation_keeps_prefix() {
        assert_eq!(convert_notation("#ff0000", Notation::Rgb), "255,0,0");
        assert_eq!(convert_notation("0,128,255", Notation::Hex), "#0080ff");
        assert_eq!(
            convert_notation("[0.300000]#00ff00", Notation::Rgb),
            "[0.300000]0,255,0"
        );
    }

    #[test]
    fn test_convert_notation_hex_rgb_hex_is_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let x = Colour::new(rng.random(), rng.random(), rng.random()).to_hex();
            let back = convert_notation(&convert_notation(&x, Notation::Rgb), Notation::Hex);
            assert_eq!(back, x);
        }
    }

    #[test]
    fn test_convert_notation_falls_back_to_input() {
        assert_eq!(convert_notation("#zzzzzz", Notation::Rgb), "#zzzzzz");
        assert_eq!(convert_notation("300,0,0", Notation::Hex), "300,0,0");
        assert_eq!(convert_notation("red", Notation::Hex), "red");
        assert_eq!(convert_notation("#FF0000", Notation::Hex), "#FF0000");
    }

    #[test]
    fn test_position_prefix() {
        let (prefix, rest) = split_position_prefix("[0.5]#000000").unwrap();
        assert_eq!(prefix, Some("[0.5]"));
        assert_eq!(rest, "#000000");
        assert_eq!(parse_position("[0.5]").unwrap(), 0.5);
        assert_eq!(parse_position("[1.5]").unwrap(), 1.5);
        assert_eq!(parse_position("[-0.25]").unwrap(), -0.25);
        assert!(parse_position("[abc]").is_err());
        assert!(parse_position("[NaN]").is_err());
        assert_eq!(split_position_prefix("#000000").unwrap(), (None, "#000000"));
    }
}
