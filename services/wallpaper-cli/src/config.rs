//! Screen presets, output naming and color/theme resolution.

use std::path::{Path, PathBuf};

use wallpaper_common::{ColorSpec, ThemeRegistry, WallpaperError, WallpaperResult};

/// Common screen sizes as `(name, width, height)`.
pub const SCREEN_PRESETS: &[(&str, u32, u32)] = &[
    ("1080p", 1920, 1080),
    ("1440p", 2560, 1440),
    ("4k", 3840, 2160),
    ("ultrawide", 3440, 1440),
];

/// Background used when neither a theme nor `--bgcolor` is given.
pub const DEFAULT_BACKGROUND: &str = "#2a2a2a";

/// Contour color used when neither a theme nor `--contour-color` is given.
pub const DEFAULT_CONTOUR_COLOR: &str = "white";

/// Pixel size of a named preset.
pub fn screen_preset(name: &str) -> WallpaperResult<(u32, u32)> {
    SCREEN_PRESETS
        .iter()
        .find(|(preset, _, _)| preset.eq_ignore_ascii_case(name))
        .map(|&(_, width, height)| (width, height))
        .ok_or_else(|| {
            let names: Vec<&str> = SCREEN_PRESETS.iter().map(|(n, _, _)| *n).collect();
            WallpaperError::InvalidArgument(format!(
                "unknown preset '{}', expected one of: {}",
                name,
                names.join(", ")
            ))
        })
}

/// One image to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    /// Preset the size came from, if any
    pub preset: Option<String>,
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
}

/// Work out the images to render.
///
/// Presets win over an explicit width and height. With more than one preset
/// every output file gets a `-<preset>` suffix.
pub fn resolve_targets(
    presets: &[String],
    width: Option<u32>,
    height: Option<u32>,
    output: &Path,
) -> WallpaperResult<Vec<RenderTarget>> {
    let mut unique: Vec<&str> = Vec::new();
    for preset in presets {
        if !unique.iter().any(|p| p.eq_ignore_ascii_case(preset)) {
            unique.push(preset.as_str());
        }
    }

    if unique.is_empty() {
        return match (width, height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => Ok(vec![RenderTarget {
                preset: None,
                width,
                height,
                output: output.to_path_buf(),
            }]),
            (Some(_), Some(_)) => Err(WallpaperError::InvalidArgument(
                "width and height must be positive".to_string(),
            )),
            _ => Err(WallpaperError::InvalidArgument(
                "either --preset or both --width and --height are required".to_string(),
            )),
        };
    }

    let suffix = unique.len() > 1;
    unique
        .into_iter()
        .map(|name| {
            let (width, height) = screen_preset(name)?;
            let output = if suffix {
                output_with_suffix(output, name)
            } else {
                output.to_path_buf()
            };
            Ok(RenderTarget {
                preset: Some(name.to_string()),
                width,
                height,
                output,
            })
        })
        .collect()
}

/// `dir/name.png` becomes `dir/name-<suffix>.png`.
pub fn output_with_suffix(output: &Path, suffix: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wallpaper".to_string());
    let file_name = match output.extension() {
        Some(ext) => format!("{}-{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}-{}", stem, suffix),
    };
    output.with_file_name(file_name)
}

/// Built-in themes, overlaid with the themes of `theme_file` when given.
pub fn load_themes(theme_file: Option<&Path>) -> WallpaperResult<ThemeRegistry> {
    let mut registry = ThemeRegistry::builtin();
    if let Some(path) = theme_file {
        let extra = ThemeRegistry::from_file(path)?;
        tracing::debug!(path = %path.display(), themes = extra.len(), "Loaded theme file");
        registry.merge(extra);
    }
    Ok(registry)
}

/// Background and contour specs for a render.
///
/// The theme provides the base pair; explicit colors replace its entries.
pub fn resolve_colors(
    registry: &ThemeRegistry,
    theme: Option<&str>,
    background: Option<&str>,
    contour: Option<&str>,
) -> WallpaperResult<(ColorSpec, ColorSpec)> {
    let (mut bg, mut fg) = match theme {
        Some(name) => {
            let theme = registry.get(name)?;
            (theme.background.clone(), theme.contour.clone())
        }
        None => (
            ColorSpec::parse(DEFAULT_BACKGROUND)?,
            ColorSpec::parse(DEFAULT_CONTOUR_COLOR)?,
        ),
    };

    if let Some(spec) = background {
        bg = ColorSpec::parse(spec)?;
    }
    if let Some(spec) = contour {
        fg = ColorSpec::parse(spec)?;
    }

    Ok((bg, fg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallpaper_common::Rgb;

    #[test]
    fn test_screen_preset_lookup() {
        assert_eq!(screen_preset("1080p").unwrap(), (1920, 1080));
        assert_eq!(screen_preset("4K").unwrap(), (3840, 2160));
        assert_eq!(screen_preset("ultrawide").unwrap(), (3440, 1440));
        assert!(matches!(
            screen_preset("8k"),
            Err(WallpaperError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_preset_overrides_explicit_size() {
        let targets = resolve_targets(
            &["1080p".to_string()],
            Some(999),
            Some(999),
            Path::new("out.png"),
        )
        .unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!((targets[0].width, targets[0].height), (1920, 1080));
        assert_eq!(targets[0].output, PathBuf::from("out.png"));
    }

    #[test]
    fn test_custom_size_without_preset() {
        let targets = resolve_targets(&[], Some(1600), Some(900), Path::new("out.png")).unwrap();
        assert_eq!(targets[0].preset, None);
        assert_eq!((targets[0].width, targets[0].height), (1600, 900));
    }

    #[test]
    fn test_missing_size_is_an_error() {
        assert!(resolve_targets(&[], None, None, Path::new("out.png")).is_err());
        assert!(resolve_targets(&[], Some(100), None, Path::new("out.png")).is_err());
        assert!(resolve_targets(&[], Some(0), Some(10), Path::new("out.png")).is_err());
    }

    #[test]
    fn test_multiple_presets_get_suffixes() {
        let presets = vec!["1080p".to_string(), "4k".to_string(), "1080P".to_string()];
        let targets = resolve_targets(&presets, None, None, Path::new("shots/alps.png")).unwrap();

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].output, PathBuf::from("shots/alps-1080p.png"));
        assert_eq!(targets[1].output, PathBuf::from("shots/alps-4k.png"));
    }

    #[test]
    fn test_output_with_suffix_without_extension() {
        assert_eq!(output_with_suffix(Path::new("alps"), "4k"), PathBuf::from("alps-4k"));
    }

    #[test]
    fn test_default_colors() {
        let (bg, fg) = resolve_colors(&ThemeRegistry::builtin(), None, None, None).unwrap();
        assert_eq!(bg, ColorSpec::Solid(Rgb::new(0x2a, 0x2a, 0x2a)));
        assert_eq!(fg, ColorSpec::Solid(Rgb::new(255, 255, 255)));
    }

    #[test]
    fn test_theme_colors_with_override() {
        let registry = ThemeRegistry::builtin();
        let (bg, fg) = resolve_colors(&registry, Some("mono_ink"), None, None).unwrap();
        assert!(bg.is_gradient());
        assert_eq!(fg, ColorSpec::Solid(Rgb::new(255, 255, 255)));

        let (bg, fg) = resolve_colors(&registry, Some("mono_ink"), None, Some("cyan")).unwrap();
        assert!(bg.is_gradient());
        assert_eq!(fg, ColorSpec::Solid(Rgb::new(0, 255, 255)));
    }

    #[test]
    fn test_unknown_theme() {
        let err = resolve_colors(&ThemeRegistry::builtin(), Some("nope"), None, None).unwrap_err();
        assert!(matches!(err, WallpaperError::ThemeNotFound { .. }));
    }

    #[test]
    fn test_bad_color_override() {
        let err = resolve_colors(&ThemeRegistry::builtin(), None, Some("#12"), None).unwrap_err();
        assert!(matches!(err, WallpaperError::InvalidColor(_)));
    }
}
