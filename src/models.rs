//! Request and response value types for the conversion API.

use serde::{Deserialize, Serialize};

/// Inbound payload for `POST /api/convert`.
///
/// Language labels are free-form; the upstream model is expected to make
/// sense of them, so no enumeration is enforced here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    /// The code to convert. Must be non-empty after trimming.
    pub source_code: String,
    /// Language the code is written in (e.g. "SQL", "Python").
    #[serde(default)]
    pub source_language: String,
    /// Language to convert the code into.
    #[serde(default)]
    pub target_language: String,
}

/// Outcome of a single conversion attempt.
///
/// Exactly one of the two variants exists per attempt; a response carrying
/// both an error message and converted code is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    Success {
        converted_code: String,
        source_language: String,
        target_language: String,
    },
    Error {
        message: String,
    },
}

impl Conversion {
    pub fn error(message: impl Into<String>) -> Self {
        Conversion::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Conversion::Success { .. })
    }
}

/// Wire shape of a conversion response.
///
/// Fields absent from the outcome are serialized as explicit `null`s, so
/// clients always see the full `{convertedCode, sourceLanguage,
/// targetLanguage, success, error}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionBody {
    pub converted_code: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

impl From<Conversion> for ConversionBody {
    fn from(outcome: Conversion) -> Self {
        match outcome {
            Conversion::Success {
                converted_code,
                source_language,
                target_language,
            } => ConversionBody {
                converted_code: Some(converted_code),
                source_language: Some(source_language),
                target_language: Some(target_language),
                success: true,
                error: None,
            },
            Conversion::Error { message } => ConversionBody {
                converted_code: None,
                source_language: None,
                target_language: None,
                success: false,
                error: Some(message),
            },
        }
    }
}
