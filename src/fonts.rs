//! Font dependencies of a template and the one-per-print-pass font loading step
//!
//! Zones name font families freely. Families the output surface already has
//! (the built-in set) need nothing; every other family has to be embedded
//! before the sheet is rendered. A family that cannot be found is reported and
//! falls back to the default font: fonts never block printing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::model::Template;

/// Families available without embedding
pub const BUILTIN_FONTS: &[&str] = &[
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Times",
    "Courier New",
    "Courier",
    "Georgia",
    "Verdana",
    "sans-serif",
    "serif",
    "monospace",
];

/// Font file formats looked up, in order of preference: (extension, css format, mime)
const FONT_FORMATS: &[(&str, &str, &str)] = &[
    ("woff2", "woff2", "font/woff2"),
    ("woff", "woff", "font/woff"),
    ("ttf", "truetype", "font/ttf"),
    ("otf", "opentype", "font/otf"),
];

/// Where fonts come from
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    /// Families that never need loading (matched case-insensitively)
    pub builtin: Vec<String>,
    /// Directory holding `<family>.<ext>` font files
    pub directory: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            builtin: BUILTIN_FONTS.iter().map(|s| s.to_string()).collect(),
            directory: None,
        }
    }
}

impl FontConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font directory
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Replace the built-in family set
    pub fn with_builtin<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builtin = families.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_builtin(&self, family: &str) -> bool {
        self.builtin.iter().any(|b| b.eq_ignore_ascii_case(family))
    }
}

/// Primary family of a CSS font-family value, unquoted
///
/// `"'Open Sans', Arial, sans-serif"` yields `Open Sans`.
pub fn primary_family(value: &str) -> Option<&str> {
    let first = value.split(',').next()?.trim();
    let unquoted = first.trim_matches(|c| c == '"' || c == '\'').trim();
    (!unquoted.is_empty()).then_some(unquoted)
}

/// Font families a template needs beyond the built-in set
///
/// Families are deduplicated case-insensitively, keeping the first spelling, and
/// returned sorted. A malformed zone layout is logged and yields no families.
pub fn required_fonts(template: &Template, config: &FontConfig) -> Vec<String> {
    let zones = match template.parse_zones() {
        Ok(zones) => zones,
        Err(e) => {
            tracing::warn!(
                template = %template.id,
                "cannot read zone layout for font discovery, using default fonts: {}",
                e
            );
            return Vec::new();
        }
    };

    let mut families: BTreeMap<String, String> = BTreeMap::new();
    for family in zones
        .iter()
        .filter_map(|z| z.style.font_family.as_deref())
        .filter_map(primary_family)
        .filter(|f| !config.is_builtin(f))
    {
        families
            .entry(family.to_lowercase())
            .or_insert_with(|| family.to_string());
    }
    families.into_values().collect()
}

/// A font embedded for output
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    pub family: String,
    /// CSS `format()` hint
    pub format: &'static str,
    /// `data:` URI with the base64 font file
    pub source: String,
}

impl FontFace {
    /// The `@font-face` rule for this font
    pub fn css(&self) -> String {
        format!(
            "@font-face {{ font-family: \"{}\"; src: url(\"{}\") format(\"{}\"); }}",
            escape_css_string(&self.family),
            self.source,
            self.format
        )
    }
}

/// Escape text for a double-quoted CSS string
///
/// `<` and `>` are escaped too so the rule can never close a CDATA section or
/// open markup.
pub fn escape_css_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '<' => out.push_str("\\3c "),
            '>' => out.push_str("\\3e "),
            '\n' => out.push_str("\\a "),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// A family name usable as a font file stem inside the font directory
fn is_plain_file_stem(family: &str) -> bool {
    !family.is_empty()
        && !family.contains("..")
        && !family
            .chars()
            .any(|c| std::path::is_separator(c) || matches!(c, '/' | '\\' | ':' | '\0'))
}

/// Outcome of the font loading step
///
/// Rendering may start once this exists, whether or not every font was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontReadiness {
    pub faces: Vec<FontFace>,
    /// Families that fall back to the default font
    pub missing: Vec<String>,
}

impl FontReadiness {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Load every required family, once, before a print pass renders anything
pub async fn ensure_fonts_ready(families: &[String], config: &FontConfig) -> FontReadiness {
    let mut readiness = FontReadiness::default();
    if families.is_empty() {
        return readiness;
    }

    let Some(directory) = &config.directory else {
        tracing::warn!(
            families = ?families,
            "no font directory configured, custom fonts fall back to the default font"
        );
        readiness.missing = families.to_vec();
        return readiness;
    };

    for family in families {
        if !is_plain_file_stem(family) {
            tracing::warn!(family = %family, "font family is not a plain file name, using default font");
            readiness.missing.push(family.clone());
            continue;
        }
        match load_face(directory, family).await {
            Some(face) => {
                tracing::debug!(family = %family, format = face.format, "font embedded");
                readiness.faces.push(face);
            }
            None => {
                tracing::warn!(family = %family, "font not found, using default font");
                readiness.missing.push(family.clone());
            }
        }
    }
    readiness
}

async fn load_face(directory: &Path, family: &str) -> Option<FontFace> {
    let compact: String = family.chars().filter(|c| !c.is_whitespace()).collect();
    let mut stems = vec![family.to_string()];
    if compact != family {
        stems.push(compact);
    }

    for &(ext, format, mime) in FONT_FORMATS {
        for stem in &stems {
            let path = directory.join(format!("{}.{}", stem, ext));
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    return Some(FontFace {
                        family: family.to_string(),
                        format,
                        source: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), "cannot read font file: {}", e);
                }
            }
        }
    }
    None
}
