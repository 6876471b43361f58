//! Decoding, viewport fitting, and export encoding for session surfaces.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use thiserror::Error;

use crate::geometry::Viewport;

pub type CodecResult<T> = std::result::Result<T, CodecError>;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to decode image source: {source}")]
    Decode {
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode {format:?} output: {source}")]
    Encode {
        format: ExportFormat,
        #[source]
        source: image::ImageError,
    },
    #[error("image source decoded to an empty {width}x{height} surface")]
    EmptySurface { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [Self::Png, Self::Jpeg];

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub const fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }

    /// Accepts the short names and MIME forms hosts are likely to carry.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "png" | "image/png" => Some(Self::Png),
            "jpg" | "jpeg" | "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// An encoded export payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

pub fn decode_image(bytes: &[u8]) -> CodecResult<RgbaImage> {
    let decoded = image::load_from_memory(bytes).map_err(|source| CodecError::Decode { source })?;
    let rgba = decoded.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(CodecError::EmptySurface {
            width: rgba.width(),
            height: rgba.height(),
        });
    }
    Ok(rgba)
}

/// Aspect-preserving fit of a source into a viewport. One dimension binds to
/// the viewport edge, the other scales by the source ratio with a truncating
/// quotient; small sources scale up. Both results are at least 1.
pub fn fitted_dimensions(source_width: u32, source_height: u32, viewport: Viewport) -> (u32, u32) {
    let wider_than_viewport = u64::from(source_width) * u64::from(viewport.height)
        > u64::from(viewport.width) * u64::from(source_height);

    if wider_than_viewport {
        let height = scale_dimension(viewport.width, source_height, source_width);
        (viewport.width.max(1), height)
    } else {
        let width = scale_dimension(viewport.height, source_width, source_height);
        (width, viewport.height.max(1))
    }
}

fn scale_dimension(base: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 1;
    }
    let scaled = (u64::from(base) * u64::from(numerator)) / u64::from(denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

pub fn fit_to_viewport(image: &RgbaImage, viewport: Viewport) -> RgbaImage {
    let (width, height) = fitted_dimensions(image.width(), image.height(), viewport);
    if (width, height) == (image.width(), image.height()) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}

pub fn encode_image(
    image: &RgbaImage,
    format: ExportFormat,
    quality: u8,
) -> CodecResult<EncodedImage> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            let encoder = PngEncoder::new(&mut bytes);
            encoder
                .write_image(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(|source| CodecError::Encode { format, source })?;
        }
        ExportFormat::Jpeg => {
            let rgb = flatten_onto_black(image);
            let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
            encoder
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
                .map_err(|source| CodecError::Encode { format, source })?;
        }
    }

    tracing::debug!(
        format = ?format,
        byte_len = bytes.len(),
        width = image.width(),
        height = image.height(),
        "encoded export payload"
    );
    Ok(EncodedImage { format, bytes })
}

/// JPEG carries no alpha channel, so translucent pixels composite onto an
/// opaque black backdrop before the channels are dropped to RGB.
fn flatten_onto_black(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let composite = |channel: u8| ((u16::from(channel) * u16::from(a) + 127) / 255) as u8;
        Rgb([composite(r), composite(g), composite(b)])
    })
}
