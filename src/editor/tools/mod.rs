mod options;

pub use crate::raster::text::TextAlign;
pub use options::{ShapeMode, ToolOptions};

/// Which option controls apply to a tool. Everything else in the shared
/// [`ToolOptions`] is ignored while that tool is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolOptionVisibility {
    pub has_stroke_color: bool,
    pub has_fill: bool,
    pub has_stroke_width: bool,
    pub has_text: bool,
}

impl ToolOptionVisibility {
    pub const fn has_any(&self) -> bool {
        let Self {
            has_stroke_color,
            has_fill,
            has_stroke_width,
            has_text,
        } = *self;
        has_stroke_color || has_fill || has_stroke_width || has_text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Rectangle,
    Circle,
    Text,
    Crop,
}

impl ToolKind {
    pub const fn option_visibility(self) -> ToolOptionVisibility {
        match self {
            Self::Pen => ToolOptionVisibility {
                has_stroke_color: true,
                has_fill: false,
                has_stroke_width: true,
                has_text: false,
            },
            Self::Eraser => ToolOptionVisibility {
                has_stroke_color: false,
                has_fill: false,
                has_stroke_width: true,
                has_text: false,
            },
            Self::Rectangle | Self::Circle => ToolOptionVisibility {
                has_stroke_color: true,
                has_fill: true,
                has_stroke_width: true,
                has_text: false,
            },
            Self::Text => ToolOptionVisibility {
                has_stroke_color: true,
                has_fill: false,
                has_stroke_width: false,
                has_text: true,
            },
            Self::Crop => ToolOptionVisibility {
                has_stroke_color: false,
                has_fill: false,
                has_stroke_width: false,
                has_text: false,
            },
        }
    }
}

/// Active tool selection plus the option set every tool reads from.
#[derive(Debug, Clone)]
pub struct EditorTools {
    active_tool: ToolKind,
    options: ToolOptions,
}

impl EditorTools {
    pub fn new() -> Self {
        Self::with_options(ToolOptions::default())
    }

    pub fn with_options(options: ToolOptions) -> Self {
        Self {
            active_tool: ToolKind::Pen,
            options,
        }
    }

    pub fn select_tool(&mut self, tool: ToolKind) {
        self.active_tool = tool;
    }

    pub fn active_tool(&self) -> ToolKind {
        self.active_tool
    }

    pub fn options(&self) -> &ToolOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ToolOptions {
        &mut self.options
    }
}

impl Default for EditorTools {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pen_shows_stroke_color_and_width() {
        let vis = ToolKind::Pen.option_visibility();
        assert!(vis.has_stroke_color);
        assert!(!vis.has_fill);
        assert!(vis.has_stroke_width);
        assert!(!vis.has_text);
        assert!(vis.has_any());
    }

    #[test]
    fn eraser_shows_only_stroke_width() {
        let vis = ToolKind::Eraser.option_visibility();
        assert!(!vis.has_stroke_color);
        assert!(!vis.has_fill);
        assert!(vis.has_stroke_width);
        assert!(!vis.has_text);
    }

    #[test]
    fn shapes_show_fill_controls() {
        for tool in [ToolKind::Rectangle, ToolKind::Circle] {
            let vis = tool.option_visibility();
            assert!(vis.has_stroke_color, "{tool:?} should have stroke color");
            assert!(vis.has_fill, "{tool:?} should have fill controls");
            assert!(vis.has_stroke_width, "{tool:?} should have stroke width");
            assert!(!vis.has_text, "{tool:?} should not have text entry");
        }
    }

    #[test]
    fn text_shows_color_and_text_entry() {
        let vis = ToolKind::Text.option_visibility();
        assert!(vis.has_stroke_color);
        assert!(!vis.has_fill);
        assert!(!vis.has_stroke_width);
        assert!(vis.has_text);
    }

    #[test]
    fn crop_has_no_options() {
        assert!(!ToolKind::Crop.option_visibility().has_any());
    }

    #[test]
    fn tool_selection_starts_at_pen_and_switches() {
        let mut tools = EditorTools::new();
        assert_eq!(tools.active_tool(), ToolKind::Pen);

        tools.select_tool(ToolKind::Crop);
        assert_eq!(tools.active_tool(), ToolKind::Crop);
    }
}
