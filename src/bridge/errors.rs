use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const INVALID_ARGS: &str = "INVALID_ARGS";
pub const DECODE_FAILED: &str = "DECODE_FAILED";
pub const CLIPBOARD_UNAVAILABLE: &str = "CLIPBOARD_UNAVAILABLE";
pub const MALFORMED_CALL: &str = "MALFORMED_CALL";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Structured error returned across the method channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<Value>,
}

impl BridgeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn invalid_args(reason: impl Into<String>) -> Self {
        Self::new(INVALID_ARGS, "Missing image path").with_details(reason.into())
    }

    pub fn decode_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(DECODE_FAILED, "Unable to load image").with_details(serde_json::json!({
            "path": path.into(),
            "reason": reason.into(),
        }))
    }

    pub fn clipboard_unavailable(reason: impl Into<String>) -> Self {
        Self::new(CLIPBOARD_UNAVAILABLE, "Clipboard is unavailable").with_details(reason.into())
    }

    pub fn malformed_call(reason: impl Into<String>) -> Self {
        Self::new(MALFORMED_CALL, "Malformed method call").with_details(reason.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_invalid_args_shape() {
        let err = BridgeError::invalid_args("arguments lack a 'path' string");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "code": "INVALID_ARGS",
                "message": "Missing image path",
                "details": "arguments lack a 'path' string",
            })
        );
    }

    #[test]
    fn test_decode_failed_carries_path() {
        let err = BridgeError::decode_failed("/tmp/x.png", "No such file");
        assert_eq!(err.code, DECODE_FAILED);
        assert_eq!(err.details.unwrap()["path"], "/tmp/x.png");
    }

    #[test]
    fn test_internal_has_no_details() {
        let err = BridgeError::internal("Method handler failed");
        assert_eq!(err.code, INTERNAL_ERROR);
        assert_eq!(err.details, None);
    }

    #[test]
    fn test_details_default_to_none_when_absent() {
        let err: BridgeError =
            serde_json::from_value(json!({"code": "X", "message": "m"})).unwrap();
        assert_eq!(err, BridgeError::new("X", "m"));
    }
}
