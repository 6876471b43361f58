//! System font resolution for the text tool.

use std::collections::HashMap;

use ab_glyph::FontArc;
use font_kit::family_name::FamilyName;
use font_kit::properties::Properties;
use font_kit::source::SystemSource;
use thiserror::Error;

pub type FontResult<T> = std::result::Result<T, FontError>;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("no system font matches family {family:?}")]
    FamilyNotFound { family: String },
    #[error("failed to load font data for family {family:?}")]
    LoadFailed { family: String },
    #[error("font data for family {family:?} is not parseable")]
    InvalidFontData { family: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontFamily {
    SansSerif,
    Serif,
    Monospace,
    Named(String),
}

impl FontFamily {
    /// Families offered by the editor's font picker.
    pub const BUILT_IN_NAMES: [&'static str; 9] = [
        "sans-serif",
        "serif",
        "monospace",
        "Arial",
        "Georgia",
        "Impact",
        "Verdana",
        "Courier New",
        "Comic Sans MS",
    ];

    /// Never fails: names outside the generic trio become `Named`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "sans-serif" => Self::SansSerif,
            "serif" => Self::Serif,
            "monospace" => Self::Monospace,
            other => Self::Named(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::SansSerif => "sans-serif",
            Self::Serif => "serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }

    /// Match candidates in preference order. Named families fall back to the
    /// system sans-serif, as a browser font stack would.
    fn candidates(&self) -> Vec<FamilyName> {
        match self {
            Self::SansSerif => vec![FamilyName::SansSerif],
            Self::Serif => vec![FamilyName::Serif],
            Self::Monospace => vec![FamilyName::Monospace],
            Self::Named(name) => vec![FamilyName::Title(name.clone()), FamilyName::SansSerif],
        }
    }
}

impl Default for FontFamily {
    fn default() -> Self {
        Self::SansSerif
    }
}

/// Resolves families through the platform font source and caches the loaded
/// faces for the lifetime of the session.
pub struct FontLibrary {
    cache: HashMap<String, FontArc>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, family: &FontFamily) -> FontResult<FontArc> {
        let key = family.name().to_string();
        if let Some(font) = self.cache.get(&key) {
            return Ok(font.clone());
        }

        let font = load_system_font(family)?;
        tracing::debug!(family = family.name(), "resolved system font");
        self.cache.insert(key, font.clone());
        Ok(font)
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("cached_families", &self.cache.len())
            .finish()
    }
}

fn load_system_font(family: &FontFamily) -> FontResult<FontArc> {
    let handle = SystemSource::new()
        .select_best_match(&family.candidates(), &Properties::new())
        .map_err(|_| FontError::FamilyNotFound {
            family: family.name().to_string(),
        })?;

    let font = handle.load().map_err(|_| FontError::LoadFailed {
        family: family.name().to_string(),
    })?;
    let data = font.copy_font_data().ok_or_else(|| FontError::LoadFailed {
        family: family.name().to_string(),
    })?;

    FontArc::try_from_vec((*data).clone()).map_err(|_| FontError::InvalidFontData {
        family: family.name().to_string(),
    })
}

#[cfg(test)]
impl FontLibrary {
    fn cached_families(&self) -> usize {
        self.cache.len()
    }
}
