//! Pixel surfaces and the CPU rasterizers that paint them.

pub mod draw;
pub mod text;

use image::{imageops, Rgba, RgbaImage};

use crate::geometry::{BoundingBox, Color};

pub(crate) fn rgba(color: Color) -> Rgba<u8> {
    Rgba(color.channels())
}

/// An RGBA8 pixel grid. The canvas and the overlay are both `Surface`s; the
/// canvas holds committed pixels, the overlay only transient previews.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn to_image(&self) -> RgbaImage {
        self.image.clone()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Resets every pixel to transparent.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Source-over blends `top` at (x, y); coordinates outside the surface
    /// are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, top: Rgba<u8>) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.width() || y >= self.height() {
            return;
        }
        let base = *self.image.get_pixel(x, y);
        self.image.put_pixel(x, y, blend_source_over(base, top));
    }

    /// Forces the pixel fully transparent, the raster form of a
    /// destination-out composite.
    pub fn erase_pixel(&mut self, x: i32, y: i32) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.width() || y >= self.height() {
            return;
        }
        self.image.put_pixel(x, y, Rgba([0, 0, 0, 0]));
    }

    /// Copies the region inside `bounds` out of the surface. `None` when the
    /// box is degenerate or not fully inside the surface.
    pub fn extract(&self, bounds: BoundingBox) -> Option<RgbaImage> {
        if bounds.is_degenerate() {
            return None;
        }
        let x = u32::try_from(bounds.x).ok()?;
        let y = u32::try_from(bounds.y).ok()?;
        if x.checked_add(bounds.width)? > self.width()
            || y.checked_add(bounds.height)? > self.height()
        {
            return None;
        }
        Some(imageops::crop_imm(&self.image, x, y, bounds.width, bounds.height).to_image())
    }

    /// Replaces the surface content wholesale, adopting the new dimensions.
    pub fn restore(&mut self, image: &RgbaImage) {
        self.image = image.clone();
    }
}

fn blend_source_over(base: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    if top[3] == 0 {
        return base;
    }
    if top[3] == 255 || base[3] == 0 {
        return top;
    }

    let top_a = f32::from(top[3]) / 255.0;
    let base_a = f32::from(base[3]) / 255.0;
    let out_a = top_a + base_a * (1.0 - top_a);

    let channel = |t: u8, b: u8| {
        let t = f32::from(t) / 255.0;
        let b = f32::from(b) / 255.0;
        let out = (t * top_a + b * base_a * (1.0 - top_a)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(top[0], base[0]),
        channel(top[1], base[1]),
        channel(top[2], base[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn new_surface_is_transparent() {
        let surface = Surface::new(4, 3);
        assert_eq!(surface.dimensions(), (4, 3));
        assert_eq!(surface.pixel(0, 0), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(surface.pixel(3, 2), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn blend_opaque_overwrites_and_out_of_bounds_is_ignored() {
        let mut surface = Surface::new(4, 4);
        surface.blend_pixel(1, 1, Rgba([10, 20, 30, 255]));
        assert_eq!(surface.pixel(1, 1), Some(Rgba([10, 20, 30, 255])));

        surface.blend_pixel(-1, 0, Rgba([255, 0, 0, 255]));
        surface.blend_pixel(4, 0, Rgba([255, 0, 0, 255]));
        assert_eq!(surface.pixel(0, 0), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn blend_half_alpha_mixes_with_an_opaque_base() {
        let mut surface = Surface::new(1, 1);
        surface.blend_pixel(0, 0, Rgba([255, 255, 255, 255]));
        surface.blend_pixel(0, 0, Rgba([108, 77, 255, 128]));

        // (c_top * 128 + c_base * 127) / 255 rounded, alpha stays opaque
        assert_eq!(surface.pixel(0, 0), Some(Rgba([181, 166, 255, 255])));
    }

    #[test]
    fn erase_forces_full_transparency() {
        let mut surface = Surface::new(2, 2);
        surface.blend_pixel(1, 0, Rgba([50, 60, 70, 255]));
        surface.erase_pixel(1, 0);
        assert_eq!(surface.pixel(1, 0), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn clear_resets_every_pixel() {
        let mut surface = Surface::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                surface.blend_pixel(x, y, Rgba([9, 9, 9, 255]));
            }
        }
        surface.clear();
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(surface.pixel(x, y), Some(Rgba([0, 0, 0, 0])));
            }
        }
    }

    #[test]
    fn extract_copies_the_exact_region() {
        let mut surface = Surface::new(6, 6);
        surface.blend_pixel(2, 3, Rgba([1, 2, 3, 255]));
        surface.blend_pixel(3, 4, Rgba([4, 5, 6, 255]));

        let region = surface
            .extract(BoundingBox::from_corners(Point::new(2, 3), Point::new(4, 5)))
            .expect("in-bounds box should extract");
        assert_eq!(region.dimensions(), (2, 2));
        assert_eq!(*region.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
        assert_eq!(*region.get_pixel(1, 1), Rgba([4, 5, 6, 255]));
    }

    #[test]
    fn extract_rejects_degenerate_and_out_of_range_boxes() {
        let surface = Surface::new(6, 6);
        assert!(surface.extract(BoundingBox::new(0, 0, 0, 4)).is_none());
        assert!(surface.extract(BoundingBox::new(-1, 0, 2, 2)).is_none());
        assert!(surface.extract(BoundingBox::new(5, 5, 2, 2)).is_none());
    }

    #[test]
    fn restore_adopts_content_and_dimensions() {
        let mut surface = Surface::new(2, 2);
        let replacement = RgbaImage::from_pixel(3, 5, Rgba([7, 8, 9, 255]));
        surface.restore(&replacement);

        assert_eq!(surface.dimensions(), (3, 5));
        assert_eq!(surface.pixel(2, 4), Some(Rgba([7, 8, 9, 255])));
    }
}
