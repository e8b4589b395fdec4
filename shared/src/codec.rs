//! Position codes.
//!
//! A code is a rig root position rounded to [`CODE_DECIMALS`] places, written as a JSON
//! object of decimal strings (`{"x":"1.50","y":"0.00","z":"-3.25"}`) and wrapped in
//! standard base64. There is no version tag or checksum: anything that decodes to three
//! numeric fields is accepted.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::CODE_DECIMALS;

/// Standard alphabet. Writes padding; reads codes with or without it, since hand-typed
/// codes often lose the trailing `=`.
const CODE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("empty code")]
    Empty,

    #[error("not base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("not UTF-8 text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("not a position record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{axis} is not a number: {value:?}")]
    NotNumeric { axis: char, value: String },
}

/// Wire record. Encoding always writes strings; decoding also takes plain JSON numbers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PositionCode {
    pub x: Coordinate,
    pub y: Coordinate,
    pub z: Coordinate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Coordinate {
    Text(String),
    Number(f64),
}

impl Coordinate {
    fn fixed(value: f32) -> Self {
        Coordinate::Text(format!("{:.*}", CODE_DECIMALS, value))
    }

    fn parse(&self, axis: char) -> Result<f32, CodecError> {
        let value = match self {
            Coordinate::Text(text) => text.trim().parse::<f32>().ok(),
            Coordinate::Number(number) => Some(*number as f32),
        };
        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| CodecError::NotNumeric {
                axis,
                value: match self {
                    Coordinate::Text(text) => text.clone(),
                    Coordinate::Number(number) => number.to_string(),
                },
            })
    }
}

impl PositionCode {
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            x: Coordinate::fixed(position.x),
            y: Coordinate::fixed(position.y),
            z: Coordinate::fixed(position.z),
        }
    }

    pub fn position(&self) -> Result<Vector3<f32>, CodecError> {
        Ok(Vector3::new(
            self.x.parse('x')?,
            self.y.parse('y')?,
            self.z.parse('z')?,
        ))
    }
}

/// Encode a root position into a shareable code.
pub fn encode(position: Vector3<f32>) -> String {
    let record = PositionCode::from_position(position);
    // A struct of strings always serializes.
    let json = serde_json::to_string(&record).unwrap_or_default();
    CODE_ENGINE.encode(json)
}

/// Decode a code back into a position. Surrounding whitespace is ignored.
pub fn decode(code: &str) -> Result<Vector3<f32>, CodecError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(CodecError::Empty);
    }
    let bytes = CODE_ENGINE.decode(code)?;
    let text = String::from_utf8(bytes)?;
    let record: PositionCode = serde_json::from_str(&text)?;
    record.position()
}

/// The position a code actually carries once `position` has been rounded for encoding.
#[cfg(test)]
pub fn rounded(position: Vector3<f32>) -> Vector3<f32> {
    let round = |v: f32| -> f32 {
        format!("{:.*}", CODE_DECIMALS, v).parse().unwrap_or(v)
    };
    Vector3::new(round(position.x), round(position.y), round(position.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    fn b64(text: &str) -> String {
        STANDARD.encode(text)
    }

    #[test]
    fn encodes_two_decimal_strings() {
        let code = encode(Vector3::new(1.5, 0.0, -3.256));
        let json = String::from_utf8(STANDARD.decode(code).unwrap()).unwrap();
        assert_eq!(json, r#"{"x":"1.50","y":"0.00","z":"-3.26"}"#);
    }

    #[test]
    fn round_trip_restores_rounded_position() {
        let samples = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(12.345, 0.0, -7.891),
            Vector3::new(-149.99, 5.0, 149.99),
            Vector3::new(-0.004, -2.5, 0.006),
            Vector3::new(80.0, 10.0, -80.0),
        ];
        for position in samples {
            let decoded = decode(&encode(position)).unwrap();
            assert_eq!(decoded, rounded(position), "{position:?}");
            assert!((decoded - position).amax() <= 0.005 + 1.0e-4);
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let code = format!("  {}\n", encode(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(decode(&code).unwrap(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn missing_padding_is_tolerated() {
        let position = Vector3::new(1.5, 0.0, -3.256);
        let code = encode(position);
        assert!(code.ends_with('='), "{code}");
        assert_eq!(decode(code.trim_end_matches('=')).unwrap(), rounded(position));
    }

    #[test]
    fn empty_code_is_rejected() {
        assert!(matches!(decode("   "), Err(CodecError::Empty)));
    }

    #[test]
    fn arbitrary_text_is_rejected() {
        assert!(matches!(decode("hello world!"), Err(CodecError::Base64(_))));
        assert!(matches!(decode("%%%%"), Err(CodecError::Base64(_))));
    }

    #[test]
    fn valid_base64_of_non_json_is_rejected() {
        assert!(matches!(decode(&b64("not json")), Err(CodecError::Json(_))));
        assert!(matches!(decode(&b64(r#"{"x":"1"}"#)), Err(CodecError::Json(_))));
        assert!(matches!(decode(&STANDARD.encode([0xff, 0xfe])), Err(CodecError::Utf8(_))));
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        let err = decode(&b64(r#"{"x":"1.00","y":"up","z":"0.00"}"#)).unwrap_err();
        match err {
            CodecError::NotNumeric { axis, value } => {
                assert_eq!(axis, 'y');
                assert_eq!(value, "up");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            decode(&b64(r#"{"x":"NaN","y":"0","z":"0"}"#)),
            Err(CodecError::NotNumeric { axis: 'x', .. })
        ));
    }

    #[test]
    fn plain_numbers_are_accepted() {
        let position = decode(&b64(r#"{"x":1.25,"y":0,"z":-4}"#)).unwrap();
        assert_eq!(position, Vector3::new(1.25, 0.0, -4.0));
    }
}
