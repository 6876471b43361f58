//! Brush, shape, and preview rasterizers over [`Surface`].
//!
//! Brush strokes are Bresenham walks stamping a round cap at every step, so
//! fast drags stay gap free. Shape outlines are rasterized as a band centered
//! on the ideal edge, matching how a stroked path straddles its geometry.

use image::Rgba;

use crate::geometry::{BoundingBox, Color, Point};

use super::{rgba, Surface};

/// Outline color shared by every in-progress drag preview.
pub const PREVIEW_OUTLINE: Color = Color::opaque(108, 77, 255);
/// Translucent wash laid over a staged crop region.
pub const PREVIEW_CROP_FILL: Color = Color::new(108, 77, 255, 77);

const PREVIEW_OUTLINE_WIDTH: u32 = 2;

#[derive(Clone, Copy)]
enum Stamp {
    Paint(Rgba<u8>),
    Erase,
}

impl Stamp {
    fn apply(self, surface: &mut Surface, x: i32, y: i32) {
        match self {
            Stamp::Paint(color) => surface.blend_pixel(x, y, color),
            Stamp::Erase => surface.erase_pixel(x, y),
        }
    }
}

pub fn paint_dab(surface: &mut Surface, center: Point, width: u32, color: Color) {
    stamp_disc(surface, center, width, Stamp::Paint(rgba(color)));
}

pub fn erase_dab(surface: &mut Surface, center: Point, width: u32) {
    stamp_disc(surface, center, width, Stamp::Erase);
}

pub fn paint_segment(surface: &mut Surface, from: Point, to: Point, width: u32, color: Color) {
    stamp_segment(surface, from, to, width, Stamp::Paint(rgba(color)));
}

pub fn erase_segment(surface: &mut Surface, from: Point, to: Point, width: u32) {
    stamp_segment(surface, from, to, width, Stamp::Erase);
}

fn stamp_segment(surface: &mut Surface, from: Point, to: Point, width: u32, stamp: Stamp) {
    for point in segment_points(from, to) {
        stamp_disc(surface, point, width, stamp);
    }
}

fn stamp_disc(surface: &mut Surface, center: Point, width: u32, stamp: Stamp) {
    let radius = (width / 2) as i32;
    let r_sq = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r_sq {
                stamp.apply(surface, center.x + dx, center.y + dy);
            }
        }
    }
}

fn segment_points(from: Point, to: Point) -> Vec<Point> {
    let mut points = Vec::new();
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (from.x, from.y);

    loop {
        points.push(Point::new(x, y));
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

pub fn fill_rectangle(surface: &mut Surface, bounds: BoundingBox, color: Color) {
    let pixel = rgba(color);
    let x1 = bounds.x.saturating_add_unsigned(bounds.width);
    let y1 = bounds.y.saturating_add_unsigned(bounds.height);
    for y in bounds.y..y1 {
        for x in bounds.x..x1 {
            surface.blend_pixel(x, y, pixel);
        }
    }
}

pub fn stroke_rectangle(surface: &mut Surface, bounds: BoundingBox, width: u32, color: Color) {
    // A point box has no path to stroke; a zero-width or zero-height box
    // still strokes as a line.
    if bounds.width == 0 && bounds.height == 0 {
        return;
    }
    let pixel = rgba(color);
    let hw = f64::from(width) / 2.0;
    let left = f64::from(bounds.x);
    let top = f64::from(bounds.y);
    let right = left + f64::from(bounds.width);
    let bottom = top + f64::from(bounds.height);

    let x0 = (left - hw).floor() as i32;
    let y0 = (top - hw).floor() as i32;
    let x1 = (right + hw).ceil() as i32;
    let y1 = (bottom + hw).ceil() as i32;

    for y in y0..y1 {
        for x in x0..x1 {
            let cx = f64::from(x) + 0.5;
            let cy = f64::from(y) + 0.5;
            let in_outer =
                cx >= left - hw && cx <= right + hw && cy >= top - hw && cy <= bottom + hw;
            let in_inner = cx > left + hw && cx < right - hw && cy > top + hw && cy < bottom - hw;
            if in_outer && !in_inner {
                surface.blend_pixel(x, y, pixel);
            }
        }
    }
}

pub fn fill_ellipse(surface: &mut Surface, bounds: BoundingBox, color: Color) {
    let rx = f64::from(bounds.width) / 2.0;
    let ry = f64::from(bounds.height) / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let pixel = rgba(color);
    let cx = f64::from(bounds.x) + rx;
    let cy = f64::from(bounds.y) + ry;
    let x1 = bounds.x.saturating_add_unsigned(bounds.width);
    let y1 = bounds.y.saturating_add_unsigned(bounds.height);

    for y in bounds.y..y1 {
        for x in bounds.x..x1 {
            let nx = (f64::from(x) + 0.5 - cx) / rx;
            let ny = (f64::from(y) + 0.5 - cy) / ry;
            if nx * nx + ny * ny <= 1.0 {
                surface.blend_pixel(x, y, pixel);
            }
        }
    }
}

pub fn stroke_ellipse(surface: &mut Surface, bounds: BoundingBox, width: u32, color: Color) {
    if bounds.width == 0 && bounds.height == 0 {
        return;
    }
    let pixel = rgba(color);
    let hw = f64::from(width) / 2.0;
    let rx = f64::from(bounds.width) / 2.0;
    let ry = f64::from(bounds.height) / 2.0;
    let cx = f64::from(bounds.x) + rx;
    let cy = f64::from(bounds.y) + ry;

    let outer_rx = rx + hw;
    let outer_ry = ry + hw;
    let inner_rx = rx - hw;
    let inner_ry = ry - hw;

    let x0 = (cx - outer_rx).floor() as i32;
    let y0 = (cy - outer_ry).floor() as i32;
    let x1 = (cx + outer_rx).ceil() as i32;
    let y1 = (cy + outer_ry).ceil() as i32;

    for y in y0..y1 {
        for x in x0..x1 {
            let px = f64::from(x) + 0.5;
            let py = f64::from(y) + 0.5;
            let ox = (px - cx) / outer_rx;
            let oy = (py - cy) / outer_ry;
            if ox * ox + oy * oy > 1.0 {
                continue;
            }
            let in_inner = inner_rx > 0.0 && inner_ry > 0.0 && {
                let ix = (px - cx) / inner_rx;
                let iy = (py - cy) / inner_ry;
                ix * ix + iy * iy < 1.0
            };
            if !in_inner {
                surface.blend_pixel(x, y, pixel);
            }
        }
    }
}

pub fn preview_rectangle(surface: &mut Surface, bounds: BoundingBox) {
    stroke_rectangle(surface, bounds, PREVIEW_OUTLINE_WIDTH, PREVIEW_OUTLINE);
}

pub fn preview_ellipse(surface: &mut Surface, bounds: BoundingBox) {
    stroke_ellipse(surface, bounds, PREVIEW_OUTLINE_WIDTH, PREVIEW_OUTLINE);
}

pub fn preview_crop(surface: &mut Surface, bounds: BoundingBox) {
    stroke_rectangle(surface, bounds, PREVIEW_OUTLINE_WIDTH, PREVIEW_OUTLINE);
    fill_rectangle(surface, bounds, PREVIEW_CROP_FILL);
}
