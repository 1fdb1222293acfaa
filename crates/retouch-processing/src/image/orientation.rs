use image::{imageops, DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

const RIGHT_ANGLE_TOLERANCE: f32 = 1e-3;

/// Image orientation operations (rotation and flipping)
pub struct ImageOrientation;

impl ImageOrientation {
    /// Rotate clockwise by an angle in degrees.
    ///
    /// Right angles use exact lossless rotations. Any other angle expands
    /// the canvas to the rotated bounding box (black fill) and resamples,
    /// so no source pixel is clipped.
    pub fn rotate(img: DynamicImage, degrees: f32) -> DynamicImage {
        let normalized = degrees.rem_euclid(360.0);

        if normalized.abs() < RIGHT_ANGLE_TOLERANCE
            || (normalized - 360.0).abs() < RIGHT_ANGLE_TOLERANCE
        {
            return img;
        }
        if (normalized - 90.0).abs() < RIGHT_ANGLE_TOLERANCE {
            return DynamicImage::ImageRgba8(imageops::rotate90(&img.to_rgba8()));
        }
        if (normalized - 180.0).abs() < RIGHT_ANGLE_TOLERANCE {
            return DynamicImage::ImageRgba8(imageops::rotate180(&img.to_rgba8()));
        }
        if (normalized - 270.0).abs() < RIGHT_ANGLE_TOLERANCE {
            return DynamicImage::ImageRgba8(imageops::rotate270(&img.to_rgba8()));
        }

        Self::rotate_arbitrary(img, normalized)
    }

    fn rotate_arbitrary(img: DynamicImage, degrees: f32) -> DynamicImage {
        let theta = degrees.to_radians();
        let (width, height) = img.dimensions();

        let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
        // Canvas must hold the unrotated image too, so clamp to source dims
        let new_width = ((width as f32 * cos + height as f32 * sin).ceil() as u32).max(width);
        let new_height = ((width as f32 * sin + height as f32 * cos).ceil() as u32).max(height);

        tracing::debug!(
            degrees = degrees,
            from_width = width,
            from_height = height,
            to_width = new_width,
            to_height = new_height,
            "Rotating by arbitrary angle"
        );

        let fill = Rgba([0u8, 0u8, 0u8, 255u8]);
        let mut canvas = RgbaImage::from_pixel(new_width, new_height, fill);

        let x_offset = ((new_width - width) / 2) as i64;
        let y_offset = ((new_height - height) / 2) as i64;
        imageops::overlay(&mut canvas, &img.to_rgba8(), x_offset, y_offset);

        let rotated = rotate_about_center(&canvas, theta, Interpolation::Bilinear, fill);
        DynamicImage::ImageRgba8(rotated)
    }

    /// Apply horizontal flip (mirror)
    pub fn flip_horizontal(img: DynamicImage) -> DynamicImage {
        DynamicImage::ImageRgba8(imageops::flip_horizontal(&img.to_rgba8()))
    }

    /// Apply vertical flip
    pub fn flip_vertical(img: DynamicImage) -> DynamicImage {
        DynamicImage::ImageRgba8(imageops::flip_vertical(&img.to_rgba8()))
    }
}
