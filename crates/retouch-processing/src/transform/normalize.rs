use retouch_core::models::{
    NumberOrString, RawCrop, RawResize, RawSharpen, RawTransformations,
};

/// Errors from normalization or the pixel pipeline.
///
/// `InvalidField` and `CropOutOfBounds` are caller mistakes (400);
/// `Decode`/`Encode` are processing failures (500).
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Invalid crop area. For an image of {src_width}x{src_height}, crop width must be <= {max_width} and crop height must be <= {max_height}.")]
    CropOutOfBounds {
        src_width: u32,
        src_height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image as {format}: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },
}

impl TransformError {
    /// Whether the error is the caller's fault (as opposed to a processing
    /// failure discovered mid-pipeline).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TransformError::InvalidField { .. } | TransformError::CropOutOfBounds { .. }
        )
    }
}

/// Crop rectangle, already validated against the source dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Resize target; at least one side is always present, a missing side
/// preserves aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTarget {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpenParams {
    pub sigma: f32,
}

impl Default for SharpenParams {
    fn default() -> Self {
        SharpenParams { sigma: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TintColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Normalized transformation set, safe to hand to the pixel pipeline.
/// Operations apply in field order; see `ImageTransformer`.
#[derive(Debug, Clone, Default)]
pub struct Transformations {
    pub crop: Option<CropRect>,
    pub resize: Option<ResizeTarget>,
    pub rotate: Option<f32>,
    pub flip: bool,
    pub flop: bool,
    pub blur: Option<f32>,
    /// JPEG re-encode quality (1-100). `None` preserves the source encoding.
    pub quality: Option<u8>,
    pub grayscale: bool,
    pub negate: bool,
    pub sharpen: Option<SharpenParams>,
    pub tint: Option<TintColor>,
}

/// Validate and coerce a raw request against the source image's intrinsic
/// dimensions. Fails on the first offending field, naming it.
pub fn normalize(
    raw: &RawTransformations,
    src_width: u32,
    src_height: u32,
) -> Result<Transformations, TransformError> {
    let crop = match &raw.crop {
        Some(c) => Some(normalize_crop(c, src_width, src_height)?),
        None => None,
    };

    let resize = match &raw.resize {
        Some(r) => Some(normalize_resize(r)?),
        None => None,
    };

    let rotate = match &raw.rotate {
        Some(v) => Some(parse_finite_f32(v, "rotate")?),
        None => None,
    };

    let blur = match &raw.blur {
        Some(v) => Some(parse_positive_f32(v, "blur")?),
        None => None,
    };

    let quality = match &raw.compress {
        Some(c) => match &c.quality {
            Some(q) => Some(parse_quality(q)?),
            // compress without a quality is a no-op, like the absent case
            None => None,
        },
        None => None,
    };

    let sharpen = match &raw.sharpen {
        None | Some(RawSharpen::Flag(false)) => None,
        Some(RawSharpen::Flag(true)) => Some(SharpenParams::default()),
        Some(RawSharpen::Params(params)) => {
            let sigma = match &params.sigma {
                Some(v) => parse_positive_f32(v, "sharpen.sigma")?,
                None => SharpenParams::default().sigma,
            };
            Some(SharpenParams { sigma })
        }
    };

    let tint = match &raw.tint {
        Some(value) => {
            parse_tint(value).map_err(|reason| TransformError::InvalidField {
                field: "tint",
                reason,
            })?
        }
        None => None,
    };

    Ok(Transformations {
        crop,
        resize,
        rotate,
        flip: raw.flip.unwrap_or(false),
        flop: raw.flop.unwrap_or(false),
        blur,
        quality,
        grayscale: raw.grayscale.unwrap_or(false),
        negate: raw.negate.unwrap_or(false),
        sharpen,
        tint,
    })
}

fn normalize_crop(
    raw: &RawCrop,
    src_width: u32,
    src_height: u32,
) -> Result<CropRect, TransformError> {
    let x = parse_u32(required(&raw.x, "crop.x")?, "crop.x")?;
    let y = parse_u32(required(&raw.y, "crop.y")?, "crop.y")?;
    let width = parse_positive_u32(required(&raw.width, "crop.width")?, "crop.width")?;
    let height = parse_positive_u32(required(&raw.height, "crop.height")?, "crop.height")?;

    let max_width = src_width.saturating_sub(x);
    let max_height = src_height.saturating_sub(y);

    if width > max_width || height > max_height {
        return Err(TransformError::CropOutOfBounds {
            src_width,
            src_height,
            max_width,
            max_height,
        });
    }

    Ok(CropRect {
        x,
        y,
        width,
        height,
    })
}

fn normalize_resize(raw: &RawResize) -> Result<ResizeTarget, TransformError> {
    let width = match &raw.width {
        Some(v) => Some(parse_positive_u32(v, "resize.width")?),
        None => None,
    };
    let height = match &raw.height {
        Some(v) => Some(parse_positive_u32(v, "resize.height")?),
        None => None,
    };

    if width.is_none() && height.is_none() {
        return Err(TransformError::InvalidField {
            field: "resize",
            reason: "at least one of width or height is required".to_string(),
        });
    }

    Ok(ResizeTarget { width, height })
}

fn required<'a>(
    value: &'a Option<NumberOrString>,
    field: &'static str,
) -> Result<&'a NumberOrString, TransformError> {
    value.as_ref().ok_or_else(|| TransformError::InvalidField {
        field,
        reason: "is required".to_string(),
    })
}

fn parse_number(value: &NumberOrString, field: &'static str) -> Result<f64, TransformError> {
    let n = value
        .as_f64()
        .ok_or_else(|| TransformError::InvalidField {
            field,
            reason: "must be a number".to_string(),
        })?;
    if !n.is_finite() {
        return Err(TransformError::InvalidField {
            field,
            reason: "must be a finite number".to_string(),
        });
    }
    Ok(n)
}

fn parse_u32(value: &NumberOrString, field: &'static str) -> Result<u32, TransformError> {
    let n = parse_number(value, field)?;
    if n < 0.0 || n > u32::MAX as f64 {
        return Err(TransformError::InvalidField {
            field,
            reason: "must be a non-negative number".to_string(),
        });
    }
    Ok(n as u32)
}

fn parse_positive_u32(value: &NumberOrString, field: &'static str) -> Result<u32, TransformError> {
    let n = parse_u32(value, field)?;
    if n == 0 {
        return Err(TransformError::InvalidField {
            field,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(n)
}

fn parse_finite_f32(value: &NumberOrString, field: &'static str) -> Result<f32, TransformError> {
    Ok(parse_number(value, field)? as f32)
}

fn parse_positive_f32(value: &NumberOrString, field: &'static str) -> Result<f32, TransformError> {
    let n = parse_number(value, field)?;
    if n <= 0.0 {
        return Err(TransformError::InvalidField {
            field,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(n as f32)
}

fn parse_quality(value: &NumberOrString) -> Result<u8, TransformError> {
    let n = parse_number(value, "compress.quality")?;
    if !(1.0..=100.0).contains(&n) {
        return Err(TransformError::InvalidField {
            field: "compress.quality",
            reason: "must be between 1 and 100".to_string(),
        });
    }
    Ok(n as u8)
}

/// Parse a tint color. `Ok(None)` means the tint is effectively white and
/// the operation should be skipped entirely - tinting white is
/// indistinguishable from not tinting.
fn parse_tint(raw: &str) -> Result<Option<TintColor>, String> {
    let value = raw.trim().to_lowercase();

    match value.as_str() {
        "white" | "#ffffff" | "#fff" => return Ok(None),
        "black" => return Ok(Some(TintColor { r: 0, g: 0, b: 0 })),
        "red" => return Ok(Some(TintColor { r: 255, g: 0, b: 0 })),
        "green" => return Ok(Some(TintColor { r: 0, g: 128, b: 0 })),
        "blue" => return Ok(Some(TintColor { r: 0, g: 0, b: 255 })),
        "gray" | "grey" => {
            return Ok(Some(TintColor {
                r: 128,
                g: 128,
                b: 128,
            }))
        }
        _ => {}
    }

    let hex = value
        .strip_prefix('#')
        .ok_or_else(|| format!("unrecognized color: {}", raw))?;

    let (r, g, b) = match hex.len() {
        3 => {
            let component = |i: usize| -> Result<u8, String> {
                let d = u8::from_str_radix(&hex[i..i + 1], 16)
                    .map_err(|_| format!("unrecognized color: {}", raw))?;
                Ok(d * 17)
            };
            (component(0)?, component(1)?, component(2)?)
        }
        6 => {
            let component = |i: usize| -> Result<u8, String> {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| format!("unrecognized color: {}", raw))
            };
            (component(0)?, component(2)?, component(4)?)
        }
        _ => return Err(format!("unrecognized color: {}", raw)),
    };

    if r == 255 && g == 255 && b == 255 {
        return Ok(None);
    }

    Ok(Some(TintColor { r, g, b }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawTransformations {
        serde_json::from_str(json).expect("valid raw transformations")
    }

    #[test]
    fn test_empty_request_is_identity() {
        let ops = normalize(&raw("{}"), 800, 600).unwrap();
        assert!(ops.crop.is_none());
        assert!(ops.resize.is_none());
        assert!(ops.rotate.is_none());
        assert!(!ops.flip && !ops.flop && !ops.grayscale && !ops.negate);
        assert!(ops.blur.is_none() && ops.quality.is_none());
        assert!(ops.sharpen.is_none() && ops.tint.is_none());
    }

    #[test]
    fn test_crop_out_of_bounds_names_maxima() {
        let err = normalize(
            &raw(r#"{"crop": {"x": 50, "y": 50, "width": 800, "height": 400}}"#),
            800,
            600,
        )
        .unwrap_err();

        match err {
            TransformError::CropOutOfBounds {
                max_width,
                max_height,
                ..
            } => {
                assert_eq!(max_width, 750);
                assert_eq!(max_height, 550);
            }
            other => panic!("expected CropOutOfBounds, got {:?}", other),
        }

        let message = normalize(
            &raw(r#"{"crop": {"x": 50, "y": 50, "width": 800, "height": 400}}"#),
            800,
            600,
        )
        .unwrap_err()
        .to_string();
        assert!(message.contains("800x600"));
        assert!(message.contains("<= 750"));
        assert!(message.contains("<= 550"));
    }

    #[test]
    fn test_crop_at_exact_bounds_is_accepted() {
        let ops = normalize(
            &raw(r#"{"crop": {"x": 50, "y": 50, "width": 750, "height": 550}}"#),
            800,
            600,
        )
        .unwrap();
        assert_eq!(
            ops.crop,
            Some(CropRect {
                x: 50,
                y: 50,
                width: 750,
                height: 550
            })
        );
    }

    #[test]
    fn test_crop_missing_field_is_named() {
        let err = normalize(
            &raw(r#"{"crop": {"y": 1, "width": 10, "height": 10}}"#),
            800,
            600,
        )
        .unwrap_err();
        match err {
            TransformError::InvalidField { field, .. } => assert_eq!(field, "crop.x"),
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_strings_coerce() {
        let ops = normalize(
            &raw(r#"{"rotate": "90", "blur": "2.5", "compress": {"quality": "80"}}"#),
            800,
            600,
        )
        .unwrap();
        assert_eq!(ops.rotate, Some(90.0));
        assert_eq!(ops.blur, Some(2.5));
        assert_eq!(ops.quality, Some(80));
    }

    #[test]
    fn test_non_numeric_field_is_rejected_by_name() {
        let err = normalize(&raw(r#"{"rotate": "ninety"}"#), 800, 600).unwrap_err();
        match err {
            TransformError::InvalidField { field, reason } => {
                assert_eq!(field, "rotate");
                assert!(reason.contains("number"));
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_blur_must_be_positive() {
        assert!(normalize(&raw(r#"{"blur": 0}"#), 800, 600).is_err());
        assert!(normalize(&raw(r#"{"blur": -1}"#), 800, 600).is_err());
    }

    #[test]
    fn test_quality_range() {
        assert!(normalize(&raw(r#"{"compress": {"quality": 0}}"#), 800, 600).is_err());
        assert!(normalize(&raw(r#"{"compress": {"quality": 101}}"#), 800, 600).is_err());
        let ops = normalize(&raw(r#"{"compress": {"quality": 1}}"#), 800, 600).unwrap();
        assert_eq!(ops.quality, Some(1));
        // compress without a quality is ignored
        let ops = normalize(&raw(r#"{"compress": {}}"#), 800, 600).unwrap();
        assert_eq!(ops.quality, None);
    }

    #[test]
    fn test_resize_requires_a_side() {
        assert!(normalize(&raw(r#"{"resize": {}}"#), 800, 600).is_err());
        let ops = normalize(&raw(r#"{"resize": {"width": "320"}}"#), 800, 600).unwrap();
        assert_eq!(
            ops.resize,
            Some(ResizeTarget {
                width: Some(320),
                height: None
            })
        );
    }

    #[test]
    fn test_white_tint_is_dropped() {
        for value in ["#FFFFFF", "#ffffff", "white", "WHITE", "#fff"] {
            let ops = normalize(
                &serde_json::from_str::<RawTransformations>(&format!(r#"{{"tint": "{}"}}"#, value))
                    .unwrap(),
                800,
                600,
            )
            .unwrap();
            assert!(ops.tint.is_none(), "tint {:?} should be dropped", value);
        }
    }

    #[test]
    fn test_tint_colors_parse() {
        let ops = normalize(&raw(r##"{"tint": "#ff0000"}"##), 800, 600).unwrap();
        assert_eq!(ops.tint, Some(TintColor { r: 255, g: 0, b: 0 }));

        let ops = normalize(&raw(r#"{"tint": "blue"}"#), 800, 600).unwrap();
        assert_eq!(ops.tint, Some(TintColor { r: 0, g: 0, b: 255 }));

        let err = normalize(&raw(r#"{"tint": "bogus"}"#), 800, 600).unwrap_err();
        match err {
            TransformError::InvalidField { field, .. } => assert_eq!(field, "tint"),
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_sharpen_flag_and_params() {
        let ops = normalize(&raw(r#"{"sharpen": true}"#), 800, 600).unwrap();
        assert_eq!(ops.sharpen, Some(SharpenParams::default()));

        let ops = normalize(&raw(r#"{"sharpen": false}"#), 800, 600).unwrap();
        assert!(ops.sharpen.is_none());

        let ops = normalize(&raw(r#"{"sharpen": {"sigma": "2.0"}}"#), 800, 600).unwrap();
        assert_eq!(ops.sharpen, Some(SharpenParams { sigma: 2.0 }));
    }
}
