//! Colors and color specifications.
//!
//! A [`ColorSpec`] is either a single color or an ordered gradient of at
//! least two colors keyed by a normalized scalar in `[0, 1]`. Strings accept
//! `#rrggbb`, `#rgb`, a color name, or a comma-separated list of those.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{WallpaperError, WallpaperResult};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        }
    }

    /// Channels scaled to `[0, 1]`.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Parse `#rrggbb`, `#rgb` or a color name.
    pub fn parse(s: &str) -> WallpaperResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| WallpaperError::InvalidColor(s.to_string()));
        }
        named_color(s).ok_or_else(|| WallpaperError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = WallpaperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::parse(s)
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        3 => {
            // #abc is shorthand for #aabbcc
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some(Rgb::new(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Rgb> {
    let rgb = match name.to_lowercase().as_str() {
        "black" => Rgb::new(0, 0, 0),
        "white" => Rgb::new(255, 255, 255),
        "red" => Rgb::new(255, 0, 0),
        "green" => Rgb::new(0, 128, 0),
        "lime" => Rgb::new(0, 255, 0),
        "blue" => Rgb::new(0, 0, 255),
        "navy" => Rgb::new(0, 0, 128),
        "yellow" => Rgb::new(255, 255, 0),
        "cyan" => Rgb::new(0, 255, 255),
        "magenta" => Rgb::new(255, 0, 255),
        "orange" => Rgb::new(255, 165, 0),
        "purple" => Rgb::new(128, 0, 128),
        "brown" => Rgb::new(165, 42, 42),
        "olive" => Rgb::new(128, 128, 0),
        "teal" => Rgb::new(0, 128, 128),
        "gray" | "grey" => Rgb::new(128, 128, 128),
        "lightgray" | "lightgrey" => Rgb::new(211, 211, 211),
        "darkgray" | "darkgrey" => Rgb::new(169, 169, 169),
        "silver" => Rgb::new(192, 192, 192),
        "beige" => Rgb::new(245, 245, 220),
        "ivory" => Rgb::new(255, 255, 240),
        _ => return None,
    };
    Some(rgb)
}

/// Single color or multi-stop gradient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawColorSpec", into = "RawColorSpec")]
pub enum ColorSpec {
    Solid(Rgb),
    /// Two or more colors, evenly spaced over `[0, 1]`.
    Gradient(Vec<Rgb>),
}

impl ColorSpec {
    /// Build a spec from an ordered list of colors. One color collapses to
    /// [`ColorSpec::Solid`]; an empty list is rejected.
    pub fn from_colors(colors: Vec<Rgb>) -> WallpaperResult<Self> {
        match colors.len() {
            0 => Err(WallpaperError::InvalidColor(
                "color list must not be empty".to_string(),
            )),
            1 => Ok(ColorSpec::Solid(colors[0])),
            _ => Ok(ColorSpec::Gradient(colors)),
        }
    }

    /// Parse a single color or a comma-separated gradient.
    pub fn parse(s: &str) -> WallpaperResult<Self> {
        let colors = s
            .split(',')
            .map(Rgb::parse)
            .collect::<WallpaperResult<Vec<_>>>()?;
        Self::from_colors(colors)
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self, ColorSpec::Gradient(_))
    }

    /// The stops of this spec; a solid color is a single stop.
    pub fn colors(&self) -> &[Rgb] {
        match self {
            ColorSpec::Solid(c) => std::slice::from_ref(c),
            ColorSpec::Gradient(colors) => colors,
        }
    }
}

impl From<Rgb> for ColorSpec {
    fn from(rgb: Rgb) -> Self {
        ColorSpec::Solid(rgb)
    }
}

impl FromStr for ColorSpec {
    type Err = WallpaperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorSpec::parse(s)
    }
}

/// Hex colors joined by commas, e.g. `#111111` or `#0f0f0f,#2a2a2a`.
impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.colors().iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// On-disk shape of a color spec: one string or a list of strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawColorSpec {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<RawColorSpec> for ColorSpec {
    type Error = WallpaperError;

    fn try_from(raw: RawColorSpec) -> Result<Self, Self::Error> {
        match raw {
            RawColorSpec::One(s) => ColorSpec::parse(&s),
            RawColorSpec::Many(list) => ColorSpec::from_colors(
                list.iter()
                    .map(|s| Rgb::parse(s))
                    .collect::<WallpaperResult<Vec<_>>>()?,
            ),
        }
    }
}

impl From<ColorSpec> for RawColorSpec {
    fn from(spec: ColorSpec) -> Self {
        match spec {
            ColorSpec::Solid(c) => RawColorSpec::One(c.to_string()),
            ColorSpec::Gradient(colors) => {
                RawColorSpec::Many(colors.iter().map(|c| c.to_string()).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse("#2a2a2a").unwrap(), Rgb::new(42, 42, 42));
        assert_eq!(Rgb::parse("#FFF").unwrap(), Rgb::new(255, 255, 255));
        assert!(Rgb::parse("#12345").is_err());
        assert!(Rgb::parse("#gg0000").is_err());
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Rgb::parse("white").unwrap(), Rgb::new(255, 255, 255));
        assert_eq!(Rgb::parse("Grey").unwrap(), Rgb::new(128, 128, 128));
        assert!(matches!(
            Rgb::parse("not-a-color"),
            Err(WallpaperError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_from_u32() {
        assert_eq!(Rgb::from_u32(0x0f1f14), Rgb::new(0x0f, 0x1f, 0x14));
    }

    #[test]
    fn test_spec_parse_list() {
        let spec = ColorSpec::parse("#000000, #ffffff").unwrap();
        assert_eq!(
            spec,
            ColorSpec::Gradient(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)])
        );
        assert_eq!(spec.to_string(), "#000000,#ffffff");
    }

    #[test]
    fn test_spec_single_collapses_to_solid() {
        let spec = ColorSpec::from_colors(vec![Rgb::new(1, 2, 3)]).unwrap();
        assert_eq!(spec, ColorSpec::Solid(Rgb::new(1, 2, 3)));
        assert!(ColorSpec::from_colors(vec![]).is_err());
    }

    #[test]
    fn test_spec_parse_rejects_empty_entry() {
        assert!(ColorSpec::parse("#000000,").is_err());
    }
}
