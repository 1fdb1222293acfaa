//! Image transformer - orchestrates all image transformations
//!
//! Applies a validated transformation set to raw image bytes in the
//! service's fixed operation order. The order is part of the observable
//! contract: geometry first, then pixel filters, then encoding.

use crate::image::filters::ImageFilters;
use crate::image::orientation::ImageOrientation;
use crate::image::resize::ImageResize;
use crate::transform::{normalize, TransformError};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use retouch_core::models::RawTransformations;
use std::io::Cursor;

/// Main image transformer
pub struct ImageTransformer;

impl ImageTransformer {
    /// Apply a raw transformation request to source bytes.
    /// Returns (output_bytes, output_content_type).
    ///
    /// Operation order, when each is present:
    /// 1. crop  2. resize  3. rotate  4. flip  5. flop  6. blur
    /// 7. compress (selects JPEG output at the given quality)
    /// 8. grayscale  9. negate  10. sharpen  11. tint
    pub fn transform(
        data: &[u8],
        raw: &RawTransformations,
    ) -> Result<(Bytes, &'static str), TransformError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode(image::ImageError::IoError(e)))?;
        let source_format = reader.format().unwrap_or(ImageFormat::Png);

        let mut img = reader.decode().map_err(TransformError::Decode)?;
        let (src_width, src_height) = img.dimensions();

        // Validate against real metadata before any pixel work
        let ops = normalize(raw, src_width, src_height)?;

        if let Some(crop) = ops.crop {
            tracing::debug!(x = crop.x, y = crop.y, width = crop.width, height = crop.height, "Applying crop");
            img = img.crop_imm(crop.x, crop.y, crop.width, crop.height);
        }

        if let Some(target) = ops.resize {
            img = ImageResize::apply(&img, target);
        }

        if let Some(degrees) = ops.rotate {
            img = ImageOrientation::rotate(img, degrees);
        }

        if ops.flip {
            img = ImageOrientation::flip_vertical(img);
        }

        if ops.flop {
            img = ImageOrientation::flip_horizontal(img);
        }

        if let Some(sigma) = ops.blur {
            img = ImageFilters::blur(img, sigma);
        }

        // Compression only selects the output codec and quality; the
        // remaining filters still run on the in-flight pixels first.

        if ops.grayscale {
            img = ImageFilters::grayscale(img);
        }

        if ops.negate {
            img = ImageFilters::negate(img);
        }

        if let Some(sharpen) = ops.sharpen {
            img = ImageFilters::sharpen(img, sharpen.sigma);
        }

        if let Some(tint) = ops.tint {
            img = ImageFilters::tint(img, tint);
        }

        encode(&img, source_format, ops.quality)
    }
}

/// Encode the transformed image. A requested quality forces lossy JPEG
/// output; otherwise the source's own format is preserved.
fn encode(
    img: &DynamicImage,
    source_format: ImageFormat,
    quality: Option<u8>,
) -> Result<(Bytes, &'static str), TransformError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    if let Some(quality) = quality {
        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| TransformError::Encode {
                format: "jpeg",
                source: e,
            })?;
        return Ok((Bytes::from(buffer), "image/jpeg"));
    }

    let (format, mime) = match source_format {
        ImageFormat::Jpeg => (ImageFormat::Jpeg, "image/jpeg"),
        ImageFormat::Gif => (ImageFormat::Gif, "image/gif"),
        ImageFormat::WebP => (ImageFormat::WebP, "image/webp"),
        _ => (ImageFormat::Png, "image/png"),
    };

    let result = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut cursor, format)
    } else {
        img.write_to(&mut cursor, format)
    };

    result.map_err(|e| TransformError::Encode {
        format: mime,
        source: e,
    })?;

    Ok((Bytes::from(buffer), mime))
}
