use crate::transform::TintColor;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

/// Pixel filters applied after the geometry operations.
pub struct ImageFilters;

impl ImageFilters {
    /// Gaussian blur with the given sigma.
    pub fn blur(img: DynamicImage, sigma: f32) -> DynamicImage {
        img.blur(sigma)
    }

    /// Convert image to grayscale
    pub fn grayscale(img: DynamicImage) -> DynamicImage {
        img.grayscale()
    }

    /// Invert colors
    pub fn negate(mut img: DynamicImage) -> DynamicImage {
        img.invert();
        img
    }

    /// Sharpen via unsharp masking.
    pub fn sharpen(img: DynamicImage, sigma: f32) -> DynamicImage {
        img.unsharpen(sigma, 0)
    }

    /// Multiplicative tint: each channel is scaled by the tint color.
    /// A white tint is the identity, which is why the normalizer drops it
    /// before this is ever reached.
    pub fn tint(img: DynamicImage, color: TintColor) -> DynamicImage {
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();
        let mut tinted = RgbaImage::new(width, height);

        let factor_r = color.r as f32 / 255.0;
        let factor_g = color.g as f32 / 255.0;
        let factor_b = color.b as f32 / 255.0;

        for (x, y, pixel) in rgba.enumerate_pixels() {
            let Rgba([r, g, b, a]) = *pixel;

            let tr = (r as f32 * factor_r).round().clamp(0.0, 255.0) as u8;
            let tg = (g as f32 * factor_g).round().clamp(0.0, 255.0) as u8;
            let tb = (b as f32 * factor_b).round().clamp(0.0, 255.0) as u8;

            tinted.put_pixel(x, y, Rgba([tr, tg, tb, a]));
        }

        DynamicImage::ImageRgba8(tinted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_keeps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let gray = ImageFilters::grayscale(img);
        assert_eq!(gray.dimensions(), (10, 10));
    }

    #[test]
    fn test_negate_inverts_channels() {
        let img =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 100, 50, 255])));
        let negated = ImageFilters::negate(img);
        let pixel = *negated.to_rgba8().get_pixel(0, 0);
        assert_eq!(pixel[0], 0);
        assert_eq!(pixel[1], 155);
        assert_eq!(pixel[2], 205);
    }

    #[test]
    fn test_negate_roundtrip() {
        let img =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([100, 150, 200, 255])));
        let twice = ImageFilters::negate(ImageFilters::negate(img.clone()));
        assert_eq!(img.to_rgba8().get_pixel(0, 0), twice.to_rgba8().get_pixel(0, 0));
    }

    #[test]
    fn test_white_tint_is_identity() {
        let img =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([12, 34, 56, 255])));
        let tinted = ImageFilters::tint(
            img.clone(),
            TintColor {
                r: 255,
                g: 255,
                b: 255,
            },
        );
        assert_eq!(img.to_rgba8(), tinted.to_rgba8());
    }

    #[test]
    fn test_red_tint_zeroes_other_channels() {
        let img =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([200, 200, 200, 255])));
        let tinted = ImageFilters::tint(img, TintColor { r: 255, g: 0, b: 0 });
        let pixel = *tinted.to_rgba8().get_pixel(0, 0);
        assert_eq!(pixel[0], 200);
        assert_eq!(pixel[1], 0);
        assert_eq!(pixel[2], 0);
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_blur_keeps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let blurred = ImageFilters::blur(img, 2.0);
        assert_eq!(blurred.dimensions(), (10, 10));
    }

    #[test]
    fn test_sharpen_keeps_dimensions() {
        let img =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([128, 128, 128, 255])));
        let sharpened = ImageFilters::sharpen(img, 1.0);
        assert_eq!(sharpened.dimensions(), (10, 10));
    }
}
