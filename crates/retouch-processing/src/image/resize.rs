use crate::transform::ResizeTarget;
use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Calculate target dimensions; a missing side preserves aspect ratio.
    pub fn calculate_dimensions(
        orig_width: u32,
        orig_height: u32,
        target: ResizeTarget,
    ) -> (u32, u32) {
        match (target.width, target.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let aspect_ratio = orig_height as f32 / orig_width as f32;
                let h = (w as f32 * aspect_ratio).round() as u32;
                (w, h.max(1))
            }
            (None, Some(h)) => {
                let aspect_ratio = orig_width as f32 / orig_height as f32;
                let w = (h as f32 * aspect_ratio).round() as u32;
                (w.max(1), h)
            }
            (None, None) => (orig_width, orig_height),
        }
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Resize to the target, stretching to exact dimensions when both sides
    /// are given.
    pub fn apply(img: &DynamicImage, target: ResizeTarget) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::calculate_dimensions(orig_width, orig_height, target);
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_calculate_dimensions_both_specified() {
        let (w, h) = ImageResize::calculate_dimensions(
            100,
            100,
            ResizeTarget {
                width: Some(50),
                height: Some(75),
            },
        );
        assert_eq!((w, h), (50, 75));
    }

    #[test]
    fn test_calculate_dimensions_width_only() {
        let (w, h) = ImageResize::calculate_dimensions(
            100,
            50,
            ResizeTarget {
                width: Some(200),
                height: None,
            },
        );
        assert_eq!(w, 200);
        // Aspect ratio preserved: 50/100 * 200 = 100
        assert_eq!(h, 100);
    }

    #[test]
    fn test_calculate_dimensions_height_only() {
        let (w, h) = ImageResize::calculate_dimensions(
            100,
            50,
            ResizeTarget {
                width: None,
                height: Some(100),
            },
        );
        assert_eq!(w, 200);
        assert_eq!(h, 100);
    }

    #[test]
    fn test_apply_resizes_exactly() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255])));
        let resized = ImageResize::apply(
            &img,
            ResizeTarget {
                width: Some(50),
                height: Some(25),
            },
        );
        assert_eq!(resized.dimensions(), (50, 25));
    }

    #[test]
    fn test_filter_selection_by_ratio() {
        use image::imageops::FilterType;
        assert_eq!(
            ImageResize::select_filter(100, 100, 40, 40),
            FilterType::Triangle
        );
        assert_eq!(
            ImageResize::select_filter(100, 100, 60, 60),
            FilterType::CatmullRom
        );
        assert_eq!(
            ImageResize::select_filter(100, 100, 90, 90),
            FilterType::Lanczos3
        );
    }
}
