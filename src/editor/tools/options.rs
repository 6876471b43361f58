use crate::codec::ExportFormat;
use crate::font::FontFamily;
use crate::geometry::Color;
use crate::raster::text::TextAlign;

/// How rectangle and circle gestures commit: solid interior or outline only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeMode {
    #[default]
    Fill,
    Stroke,
}

impl ShapeMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fill" => Some(Self::Fill),
            "stroke" => Some(Self::Stroke),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Stroke => "stroke",
        }
    }
}

/// Option set shared by every tool. Sliders clamp here so the rest of the
/// editor can trust the ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOptions {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub stroke_width: u32,
    pub shape_mode: ShapeMode,
    pub font_family: FontFamily,
    pub font_size: u32,
    pub text_align: TextAlign,
    pub text: String,
    pub export_format: ExportFormat,
    pub jpeg_quality: u8,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            stroke_color: Color::opaque(0x6C, 0x4D, 0xFF),
            fill_color: Color::opaque(0xE6, 0xA6, 0xFF),
            stroke_width: 5,
            shape_mode: ShapeMode::Fill,
            font_family: FontFamily::SansSerif,
            font_size: 48,
            text_align: TextAlign::Left,
            text: String::from("Hello World"),
            export_format: ExportFormat::Png,
            jpeg_quality: 92,
        }
    }
}

impl ToolOptions {
    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    pub fn set_stroke_width(&mut self, width: u32) {
        self.stroke_width = clamp_u32_range(width, 1, 100);
    }

    pub fn set_shape_mode(&mut self, mode: ShapeMode) {
        self.shape_mode = mode;
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        self.font_family = family;
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = clamp_u32_range(size, 8, 128);
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.text_align = align;
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub fn set_export_format(&mut self, format: ExportFormat) {
        self.export_format = format;
    }

    pub fn set_jpeg_quality(&mut self, quality: u8) {
        self.jpeg_quality = clamp_u8_range(quality, 1, 100);
    }
}

const fn clamp_u32_range(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

const fn clamp_u8_range(value: u8, min: u8, max: u8) -> u8 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
