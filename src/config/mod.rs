use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codec::ExportFormat;
use crate::editor::tools::{ShapeMode, TextAlign, ToolOptions};
use crate::font::FontFamily;
use crate::geometry::{Color, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "sseuk";
const APP_CONFIG_FILE: &str = "config.json";

/// Editor settings from `config.json`. Every field is optional; anything
/// missing or unparseable falls back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub viewport_width: Option<u32>,
    #[serde(default)]
    pub viewport_height: Option<u32>,
    #[serde(default)]
    pub stroke_color: Option<String>,
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<u32>,
    #[serde(default)]
    pub shape_mode: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub text_align: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub export_format: Option<String>,
    #[serde(default)]
    pub jpeg_quality: Option<u8>,
}

impl EditorConfig {
    /// The viewport new sessions fit their image into.
    pub fn viewport(&self) -> Viewport {
        let defaults = Viewport::default();
        Viewport::new(
            self.viewport_width.unwrap_or(defaults.width).max(1),
            self.viewport_height.unwrap_or(defaults.height).max(1),
        )
    }

    /// Tool options with the configured overrides applied. Values pass
    /// through the regular setters, so slider ranges still clamp.
    pub fn tool_options(&self) -> ToolOptions {
        let mut options = ToolOptions::default();

        if let Some(hex) = &self.stroke_color {
            match Color::from_hex(hex) {
                Some(color) => options.set_stroke_color(color),
                None => tracing::warn!(value = %hex, "unparseable stroke_color; keeping default"),
            }
        }
        if let Some(hex) = &self.fill_color {
            match Color::from_hex(hex) {
                Some(color) => options.set_fill_color(color),
                None => tracing::warn!(value = %hex, "unparseable fill_color; keeping default"),
            }
        }
        if let Some(width) = self.stroke_width {
            options.set_stroke_width(width);
        }
        if let Some(name) = &self.shape_mode {
            match ShapeMode::from_name(name) {
                Some(mode) => options.set_shape_mode(mode),
                None => tracing::warn!(value = %name, "unknown shape_mode; keeping default"),
            }
        }
        if let Some(name) = &self.font_family {
            options.set_font_family(FontFamily::from_name(name));
        }
        if let Some(size) = self.font_size {
            options.set_font_size(size);
        }
        if let Some(name) = &self.text_align {
            match TextAlign::from_name(name) {
                Some(align) => options.set_text_align(align),
                None => tracing::warn!(value = %name, "unknown text_align; keeping default"),
            }
        }
        if let Some(text) = &self.text {
            options.set_text(text.clone());
        }
        if let Some(name) = &self.export_format {
            match ExportFormat::from_name(name) {
                Some(format) => options.set_export_format(format),
                None => tracing::warn!(value = %name, "unknown export_format; keeping default"),
            }
        }
        if let Some(quality) = self.jpeg_quality {
            options.set_jpeg_quality(quality);
        }

        options
    }
}

pub fn load_editor_config() -> EditorConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_editor_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_editor_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> EditorConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return EditorConfig::default(),
    };
    if !path.exists() {
        return EditorConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            EditorConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            EditorConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
