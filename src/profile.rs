//! Print profiles - TOML configuration for resolution, sheet layout, fonts and output
//!
//! A profile only needs to name what differs from the defaults; every section
//! and key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::fonts::{FontConfig, BUILTIN_FONTS};
use crate::layout::{RenderScale, SheetConfig};
use crate::renderer::SvgConfig;
use crate::PrintConfig;

/// Errors that can occur when loading or parsing profiles
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read profile file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse profile TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Default print profile, also shown by `cardsheet profile`
pub const DEFAULT_PROFILE: &str = r##"
[metadata]
name = "default"
description = "300 dpi print on a 13x19 inch sheet, 4 units per row"

[print]
# Density zone coordinates are designed at
base_dpi = 96.0
# Density cards are rendered at for print
dpi = 300.0

[sheet]
# Units per row (an entity's front and back sit side by side)
columns = 4
# Registration mark arm length and stroke, mm
mark_size = 5.0
mark_stroke = 0.25
# Space between units and around the grid, mm
gap = 4.0
margin = 10.0
# Smallest sheet, mm
min_width = 330.2
min_height = 482.6

[fonts]
# Families that never need embedding
builtin = ["Arial", "Helvetica", "Times New Roman", "Times", "Courier New", "Courier",
           "Georgia", "Verdana", "sans-serif", "serif", "monospace"]
# Directory with <family>.woff2|woff|ttf|otf files, relative to this file
# directory = "fonts"

[output]
standalone = true
pretty_print = true
embed_fonts = true
mark_color = "#000000"
# Outline trim and bleed boxes for proofing
guides = false
"##;

/// A loaded print profile
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrintProfile {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub print: PrintSection,
    #[serde(default)]
    pub sheet: SheetSection,
    #[serde(default)]
    pub fonts: FontSection,
    #[serde(default)]
    pub output: OutputSection,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Metadata {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrintSection {
    pub base_dpi: f64,
    pub dpi: f64,
}

impl Default for PrintSection {
    fn default() -> Self {
        Self {
            base_dpi: 96.0,
            dpi: 300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SheetSection {
    pub columns: usize,
    pub mark_size: f64,
    pub mark_stroke: f64,
    pub gap: f64,
    pub margin: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for SheetSection {
    fn default() -> Self {
        Self {
            columns: 4,
            mark_size: 5.0,
            mark_stroke: 0.25,
            gap: 4.0,
            margin: 10.0,
            min_width: 330.2,
            min_height: 482.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontSection {
    pub builtin: Vec<String>,
    pub directory: Option<PathBuf>,
}

impl Default for FontSection {
    fn default() -> Self {
        Self {
            builtin: BUILTIN_FONTS.iter().map(|s| s.to_string()).collect(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub standalone: bool,
    pub pretty_print: bool,
    pub embed_fonts: bool,
    pub mark_color: String,
    pub guides: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            embed_fonts: true,
            mark_color: "#000000".to_string(),
            guides: false,
        }
    }
}

impl PrintProfile {
    /// Load profile from TOML file
    ///
    /// Relative font directories resolve against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        let mut profile = Self::from_str(&content)?;
        profile.base_path = path.parent().map(Path::to_path_buf);
        Ok(profile)
    }

    /// Load profile from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolution cards are rendered at for print
    pub fn print_scale(&self) -> RenderScale {
        RenderScale::new(self.print.base_dpi, self.print.dpi, 1.0)
    }

    /// Resolution for on-screen preview at `zoom`
    pub fn preview_scale(&self, zoom: f64) -> RenderScale {
        RenderScale::new(self.print.base_dpi, self.print.base_dpi, zoom)
    }

    pub fn sheet_config(&self) -> SheetConfig {
        let s = &self.sheet;
        SheetConfig::new()
            .with_columns(s.columns)
            .with_marks(s.mark_size, s.mark_stroke)
            .with_gap(s.gap)
            .with_margin(s.margin)
            .with_min_sheet_size(s.min_width, s.min_height)
            .with_scale(self.print_scale())
    }

    pub fn font_config(&self) -> FontConfig {
        let config = FontConfig::new().with_builtin(self.fonts.builtin.iter().cloned());
        match &self.fonts.directory {
            Some(dir) => config.with_directory(self.resolve_path(dir)),
            None => config,
        }
    }

    pub fn svg_config(&self) -> SvgConfig {
        let output = &self.output;
        let config = SvgConfig::new()
            .with_standalone(output.standalone)
            .with_pretty_print(output.pretty_print)
            .with_embedded_fonts(output.embed_fonts)
            .with_mark_color(output.mark_color.clone())
            .with_guides(output.guides);
        match &self.metadata.name {
            Some(name) => config.with_title(name.clone()),
            None => config,
        }
    }

    /// Full pipeline configuration
    pub fn print_config(&self) -> PrintConfig {
        PrintConfig::new()
            .with_sheet(self.sheet_config())
            .with_fonts(self.font_config())
            .with_svg(self.svg_config())
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for PrintProfile {
    fn default() -> Self {
        Self::from_str(DEFAULT_PROFILE).expect("Default profile should be valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_profile_matches_section_defaults() {
        let profile = PrintProfile::default();
        assert_eq!(profile.metadata.name.as_deref(), Some("default"));
        assert_eq!(profile.print, PrintSection::default());
        assert_eq!(profile.sheet, SheetSection::default());
        assert_eq!(profile.fonts, FontSection::default());
        assert_eq!(profile.output, OutputSection::default());
    }

    #[test]
    fn test_default_profile_matches_config_defaults() {
        let profile = PrintProfile::default();
        assert_eq!(profile.sheet_config(), SheetConfig::default());
        assert_eq!(profile.font_config(), FontConfig::default());
    }

    #[test]
    fn test_partial_profile_keeps_defaults() {
        let profile = PrintProfile::from_str(
            r#"
[sheet]
columns = 2
mark_size = 8.0
"#,
        )
        .expect("Should parse");

        let sheet = profile.sheet_config();
        assert_eq!(sheet.columns, 2);
        assert_eq!(sheet.mark_size, 8.0);
        assert_eq!(sheet.mark_stroke, 0.25);
        assert_eq!(sheet.scale.factor(), 3.125);
        assert_eq!(profile.metadata.name, None);
    }

    #[test]
    fn test_print_and_preview_scales() {
        let profile = PrintProfile::from_str("[print]\ndpi = 600.0\n").unwrap();
        assert_eq!(profile.print_scale().factor(), 6.25);
        assert_eq!(profile.preview_scale(2.0).factor(), 2.0);
    }

    #[test]
    fn test_relative_font_directory_resolves_against_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(&path, "[fonts]\ndirectory = \"fonts\"\n").unwrap();

        let profile = PrintProfile::from_file(&path).expect("Should load");
        assert_eq!(profile.font_config().directory, Some(dir.path().join("fonts")));
    }

    #[test]
    fn test_output_section_drives_svg_config() {
        let profile = PrintProfile::from_str(
            r##"
[metadata]
name = "proof"

[output]
guides = true
mark_color = "#ff00ff"
embed_fonts = false
"##,
        )
        .unwrap();

        let svg = profile.svg_config();
        assert!(svg.show_guides);
        assert!(!svg.embed_fonts);
        assert!(svg.standalone);
        assert_eq!(svg.mark_color, "#ff00ff");
        assert_eq!(svg.title.as_deref(), Some("proof"));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = PrintProfile::from_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(ProfileError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_error() {
        let result = PrintProfile::from_file(Path::new("/nonexistent/profile.toml"));
        assert!(matches!(result, Err(ProfileError::IoError(_))));
    }
}
