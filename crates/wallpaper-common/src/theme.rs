//! Named color themes.
//!
//! A theme pairs a background spec with a contour spec. The registry is a
//! plain lookup resolved by the caller before rendering; the renderer only
//! ever sees the resulting [`ColorSpec`]s.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::color::{ColorSpec, Rgb};
use crate::error::{WallpaperError, WallpaperResult};

/// Background and contour colors of one theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub background: ColorSpec,
    pub contour: ColorSpec,
}

/// Name to theme lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, Theme>,
}

type ThemeRow = (&'static str, &'static [u32], &'static [u32]);

const BUILTIN_THEMES: &[ThemeRow] = &[
    // Minimalist
    ("mono_ink", &[0x0f0f0f, 0x2a2a2a], &[0xffffff]),
    ("paper_charcoal", &[0xf7f3e9, 0xded6c8], &[0x2b2b2b]),
    ("blueprint_minimal", &[0x001f3f, 0x003566], &[0xa8dadc]),
    ("desert_minimal", &[0xf4e8d1, 0xd6b98c], &[0x6b4f2c]),
    ("night_glow", &[0x020617, 0x111827], &[0x7dd3fc, 0xe0f2fe]),
    // Retro
    ("neon_90s_dark", &[0x050014, 0x12003a, 0x00f0ff], &[0xff2bd6, 0xf8ff00]),
    ("neon_90s_light", &[0xf5fbff, 0xb8fbff, 0xffb3ec], &[0x6a00ff, 0xff2bd6]),
    ("vhs_static", &[0x1c1c1c, 0x5e5e5e, 0xd6d6d6], &[0xff005d, 0x00e5ff]),
    // Natural
    ("lichen_forest", &[0x0f1f14, 0x2f4f2f, 0x6b8e23, 0xcde77f], &[0xf2e8cf, 0xa3b18a]),
    ("autumn_ridge", &[0x2b1300, 0x6b2d0a, 0xb45309, 0xf4a261], &[0xfff3e0, 0xffd166]),
    ("polar_night", &[0x020617, 0x0b1c2d, 0x164e63, 0x38bdf8], &[0xe0f2fe, 0x7dd3fc]),
    // Cartographic
    ("bathymetry_blue", &[0x001219, 0x003049, 0x005f73, 0x94d2bd], &[0xe9d8a6, 0xffd166]),
    ("paper_map", &[0xf8f4e3, 0xe8dfc8, 0xd6cbb0], &[0x5a4632, 0x9c6b30]),
    // Atmospheric
    ("volcanic_glass", &[0x050505, 0x2b0a0a, 0x5c0f0f, 0xff4500], &[0xffae00, 0xfff1c1]),
    ("orbital_dust", &[0x0d0221, 0x2e1f47, 0x6a4c93, 0xcdb4db], &[0xeae4ff, 0xffd6ff]),
    ("aurora_borealis", &[0x020617, 0x064e3b, 0x10b981, 0x99f6e4], &[0xecfeff, 0xa7f3d0]),
];

fn spec_from_packed(packed: &[u32]) -> ColorSpec {
    let colors: Vec<Rgb> = packed.iter().map(|&p| Rgb::from_u32(p)).collect();
    if colors.len() == 1 {
        ColorSpec::Solid(colors[0])
    } else {
        ColorSpec::Gradient(colors)
    }
}

impl ThemeRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in themes.
    pub fn builtin() -> Self {
        let themes = BUILTIN_THEMES
            .iter()
            .map(|(name, background, contour)| {
                (
                    name.to_string(),
                    Theme {
                        background: spec_from_packed(background),
                        contour: spec_from_packed(contour),
                    },
                )
            })
            .collect();
        Self { themes }
    }

    /// Parse a YAML theme table: `name: { background: ..., contour: ... }`.
    pub fn from_yaml(yaml: &str) -> WallpaperResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON theme table with the same shape as the YAML one.
    pub fn from_json(json: &str) -> WallpaperResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a theme table, choosing the format from the file extension
    /// (`.json`, otherwise YAML).
    pub fn from_file(path: impl AsRef<Path>) -> WallpaperResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, theme: Theme) {
        self.themes.insert(name.into(), theme);
    }

    /// Add every theme of `other`, replacing same-named entries.
    pub fn merge(&mut self, other: ThemeRegistry) {
        self.themes.extend(other.themes);
    }

    pub fn get(&self, name: &str) -> WallpaperResult<&Theme> {
        self.themes
            .get(name)
            .ok_or_else(|| WallpaperError::ThemeNotFound {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Theme names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.themes.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
