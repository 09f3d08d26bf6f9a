//! Conversion request and response types

use serde::{Deserialize, Serialize};

/// Input for a single conversion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionInput {
    /// The raw text to convert to markdown
    pub text: String,
}

impl ConversionInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Outcome of a conversion call.
///
/// Returned by value; the cache hands out clones, never references into
/// its own storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResponse {
    /// The converted markdown (empty on failure)
    pub markdown: String,
    /// Whether the conversion was successful
    pub success: bool,
    /// Error message if the conversion failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResponse {
    /// A successful conversion carrying `markdown`.
    pub fn success(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            success: true,
            error: None,
        }
    }

    /// A failed conversion carrying an error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            markdown: String::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_omits_error_field() {
        let json = serde_json::to_value(ConversionResponse::success("# T\n\nT\n")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["markdown"], "# T\n\nT\n");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failure_round_trips_through_json() {
        let failed = ConversionResponse::failure("backend unavailable");
        let json = serde_json::to_string(&failed).unwrap();
        let back: ConversionResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, failed);
        assert!(!back.is_success());
        assert!(back.markdown.is_empty());
    }

    #[test]
    fn deserializes_without_error_field() {
        let r: ConversionResponse =
            serde_json::from_str(r##"{"markdown":"# x\n\nx\n","success":true}"##).unwrap();
        assert!(r.is_success());
        assert_eq!(r.error, None);
    }
}
