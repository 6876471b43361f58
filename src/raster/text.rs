//! Glyph layout and rasterization for the text tool.

use ab_glyph::{point, Font, FontArc, GlyphId, ScaleFont};
use image::Rgba;

use crate::geometry::{Color, Point};

use super::Surface;

/// Lines advance by this factor of the font size, the usual browser default
/// for unstyled text.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Horizontal placement of each text line relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Rasterizes `text` onto the surface with the first baseline at `anchor`.
/// Lines are split on `'\n'` and the alignment is applied per line.
pub fn draw_text(
    surface: &mut Surface,
    font: &FontArc,
    text: &str,
    size: f32,
    align: TextAlign,
    anchor: Point,
    color: Color,
) {
    let line_height = size * LINE_HEIGHT_FACTOR;

    for (line_index, line) in text.split('\n').enumerate() {
        let baseline_y = anchor.y as f32 + line_index as f32 * line_height;
        for (glyph_id, glyph_x) in layout_line(font, line, size, align) {
            let position = point(anchor.x as f32 + glyph_x, baseline_y);
            let glyph = glyph_id.with_scale_and_position(size, position);
            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let alpha = (f32::from(color.a) * coverage).round().min(255.0) as u8;
                if alpha == 0 {
                    return;
                }
                surface.blend_pixel(
                    bounds.min.x as i32 + gx as i32,
                    bounds.min.y as i32 + gy as i32,
                    Rgba([color.r, color.g, color.b, alpha]),
                );
            });
        }
    }
}

/// Positions one line's glyphs relative to the anchor, kerned and aligned.
fn layout_line(font: &FontArc, line: &str, size: f32, align: TextAlign) -> Vec<(GlyphId, f32)> {
    let scaled = font.as_scaled(size);
    let mut glyphs = Vec::new();
    let mut cursor_x = 0.0f32;
    let mut last_glyph: Option<GlyphId> = None;

    for ch in line.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = last_glyph {
            cursor_x += scaled.kern(prev, glyph_id);
        }
        glyphs.push((glyph_id, cursor_x));
        cursor_x += scaled.h_advance(glyph_id);
        last_glyph = Some(glyph_id);
    }

    let offset = match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => -cursor_x * 0.5,
        TextAlign::Right => -cursor_x,
    };
    for glyph in &mut glyphs {
        glyph.1 += offset;
    }
    glyphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontFamily, FontLibrary};

    const INK: Color = Color::opaque(20, 20, 20);

    // Glyph rendering needs a real system font, so these tests bail out
    // quietly on hosts without one.
    fn test_font() -> Option<FontArc> {
        FontLibrary::new().resolve(&FontFamily::SansSerif).ok()
    }

    fn painted_extent(surface: &Surface) -> Option<(u32, u32, u32, u32)> {
        let mut extent: Option<(u32, u32, u32, u32)> = None;
        for y in 0..surface.height() {
            for x in 0..surface.width() {
                if surface.pixel(x, y).is_some_and(|p| p[3] != 0) {
                    extent = Some(match extent {
                        None => (x, y, x, y),
                        Some((min_x, min_y, max_x, max_y)) => {
                            (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
                        }
                    });
                }
            }
        }
        extent
    }

    #[test]
    fn empty_and_whitespace_text_paint_nothing() {
        let Some(font) = test_font() else { return };
        let mut surface = Surface::new(120, 80);

        draw_text(&mut surface, &font, "", 32.0, TextAlign::Left, Point::new(10, 40), INK);
        draw_text(&mut surface, &font, "   ", 32.0, TextAlign::Left, Point::new(10, 40), INK);

        assert!(painted_extent(&surface).is_none());
    }

    #[test]
    fn alignment_shifts_lines_around_the_anchor() {
        let Some(font) = test_font() else { return };
        let anchor = Point::new(100, 60);

        let mut left = Surface::new(200, 100);
        draw_text(&mut left, &font, "Hop", 32.0, TextAlign::Left, anchor, INK);
        let (left_min, ..) = painted_extent(&left).expect("left-aligned text should paint");
        assert!(left_min >= 90, "left-aligned text started at {left_min}");

        let mut right = Surface::new(200, 100);
        draw_text(&mut right, &font, "Hop", 32.0, TextAlign::Right, anchor, INK);
        let (.., right_max, _) = painted_extent(&right).expect("right-aligned text should paint");
        assert!(right_max <= 110, "right-aligned text ended at {right_max}");

        let mut center = Surface::new(200, 100);
        draw_text(&mut center, &font, "Hop", 32.0, TextAlign::Center, anchor, INK);
        let (center_min, _, center_max, _) =
            painted_extent(&center).expect("center-aligned text should paint");
        assert!(center_min < 100 && center_max > 100);
    }

    #[test]
    fn newline_advances_the_baseline() {
        let Some(font) = test_font() else { return };
        let mut surface = Surface::new(100, 160);
        draw_text(
            &mut surface,
            &font,
            "I\nI",
            32.0,
            TextAlign::Left,
            Point::new(20, 50),
            INK,
        );

        let (_, min_y, _, max_y) = painted_extent(&surface).expect("two lines should paint");
        assert!(
            max_y - min_y > 32,
            "lines spanned only {} rows",
            max_y - min_y
        );
    }

    #[test]
    fn glyph_pixels_carry_the_requested_color() {
        let Some(font) = test_font() else { return };
        let mut surface = Surface::new(120, 80);
        draw_text(
            &mut surface,
            &font,
            "X",
            40.0,
            TextAlign::Left,
            Point::new(30, 55),
            INK,
        );

        let mut saw_pixel = false;
        for y in 0..surface.height() {
            for x in 0..surface.width() {
                let Some(pixel) = surface.pixel(x, y) else { continue };
                if pixel[3] == 0 {
                    continue;
                }
                saw_pixel = true;
                assert_eq!((pixel[0], pixel[1], pixel[2]), (INK.r, INK.g, INK.b));
            }
        }
        assert!(saw_pixel, "glyph should cover at least one pixel");
    }
}
