use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A numeric wire value. Browser clients send form-derived values, so every
/// numeric field may arrive as a JSON number or as its string spelling;
/// coercion happens in the transform normalizer, which reports the offending
/// field on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    /// Best-effort numeric view. `None` means the value does not parse.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Raw, untrusted transformation request as received over the wire.
///
/// Every operation is optional; an absent field means the operation is
/// skipped. This type is never handed to the pixel pipeline directly - it
/// must pass through the normalizer first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RawTransformations {
    pub crop: Option<RawCrop>,
    pub resize: Option<RawResize>,
    /// Rotation angle in degrees.
    #[schema(value_type = Option<f64>)]
    pub rotate: Option<NumberOrString>,
    /// Vertical mirror.
    pub flip: Option<bool>,
    /// Horizontal mirror.
    pub flop: Option<bool>,
    /// Gaussian blur sigma.
    #[schema(value_type = Option<f64>)]
    pub blur: Option<NumberOrString>,
    pub compress: Option<RawCompress>,
    pub grayscale: Option<bool>,
    pub negate: Option<bool>,
    /// Either a boolean flag (default sharpening) or `{"sigma": ...}`.
    #[schema(value_type = Option<Object>)]
    pub sharpen: Option<RawSharpen>,
    /// Tint color: `#rgb`/`#rrggbb` hex or a named color. White is a no-op
    /// and is dropped during normalization.
    pub tint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RawCrop {
    #[schema(value_type = Option<f64>)]
    pub x: Option<NumberOrString>,
    #[schema(value_type = Option<f64>)]
    pub y: Option<NumberOrString>,
    #[schema(value_type = Option<f64>)]
    pub width: Option<NumberOrString>,
    #[schema(value_type = Option<f64>)]
    pub height: Option<NumberOrString>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RawResize {
    #[schema(value_type = Option<f64>)]
    pub width: Option<NumberOrString>,
    #[schema(value_type = Option<f64>)]
    pub height: Option<NumberOrString>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RawCompress {
    #[schema(value_type = Option<f64>)]
    pub quality: Option<NumberOrString>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSharpen {
    Flag(bool),
    Params(RawSharpenParams),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSharpenParams {
    pub sigma: Option<NumberOrString>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_fields_accept_strings_and_numbers() {
        let raw: RawTransformations = serde_json::from_str(
            r#"{
                "crop": {"x": "50", "y": 50, "width": "800", "height": 400},
                "rotate": "90",
                "blur": 2.5
            }"#,
        )
        .expect("deserialize");

        let crop = raw.crop.expect("crop present");
        assert_eq!(crop.x.unwrap().as_f64(), Some(50.0));
        assert_eq!(crop.width.unwrap().as_f64(), Some(800.0));
        assert_eq!(raw.rotate.unwrap().as_f64(), Some(90.0));
        assert_eq!(raw.blur.unwrap().as_f64(), Some(2.5));
    }

    #[test]
    fn test_non_numeric_string_does_not_coerce() {
        let value = NumberOrString::Text("wide".to_string());
        assert_eq!(value.as_f64(), None);
    }

    #[test]
    fn test_sharpen_flag_or_params() {
        let raw: RawTransformations =
            serde_json::from_str(r#"{"sharpen": true}"#).expect("deserialize");
        assert!(matches!(raw.sharpen, Some(RawSharpen::Flag(true))));

        let raw: RawTransformations =
            serde_json::from_str(r#"{"sharpen": {"sigma": "1.5"}}"#).expect("deserialize");
        match raw.sharpen {
            Some(RawSharpen::Params(params)) => {
                assert_eq!(params.sigma.unwrap().as_f64(), Some(1.5));
            }
            other => panic!("expected params, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_request_deserializes() {
        let raw: RawTransformations = serde_json::from_str("{}").expect("deserialize");
        assert!(raw.crop.is_none());
        assert!(raw.tint.is_none());
    }
}
