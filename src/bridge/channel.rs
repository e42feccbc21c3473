use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::errors::BridgeError;

/// A named invocation arriving over the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Look up a string argument. `None` when the arguments are absent, are
    /// not a mapping, or hold something other than a string under `key`.
    pub fn string_argument(&self, key: &str) -> Option<&str> {
        self.arguments.as_ref()?.as_object()?.get(key)?.as_str()
    }
}

/// The single reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResult {
    Success {
        #[serde(default)]
        result: Option<Value>,
    },
    Error {
        error: BridgeError,
    },
    NotImplemented,
}

impl MethodResult {
    pub fn success() -> Self {
        Self::Success { result: None }
    }

    pub fn error(error: BridgeError) -> Self {
        Self::Error { error }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(&error.code),
            _ => None,
        }
    }
}

pub trait MethodHandler: Send + Sync {
    /// Method names this handler answers.
    fn methods(&self) -> &[&'static str];
    fn handle(&self, call: &MethodCall) -> MethodResult;
}

/// Named registry of method handlers.
#[derive(Clone)]
pub struct MethodChannel {
    name: String,
    handlers: HashMap<String, Arc<dyn MethodHandler>>,
}

impl MethodChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `handler` for every method it lists. A later registration
    /// for the same method replaces the earlier one.
    pub fn register(&mut self, handler: Arc<dyn MethodHandler>) {
        for method in handler.methods() {
            if self.handlers.contains_key(*method) {
                warn!(channel = %self.name, method = %method, "Replacing existing method handler");
            }
            self.handlers.insert(method.to_string(), Arc::clone(&handler));
        }
    }

    pub fn methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = self.handlers.keys().cloned().collect();
        methods.sort();
        methods
    }

    pub fn invoke(&self, call: &MethodCall) -> MethodResult {
        match self.handlers.get(&call.method) {
            Some(handler) => handler.handle(call),
            None => {
                debug!(channel = %self.name, method = %call.method, "No handler for method");
                MethodResult::NotImplemented
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Echo;

    impl MethodHandler for Echo {
        fn methods(&self) -> &[&'static str] {
            &["echo", "ping"]
        }

        fn handle(&self, call: &MethodCall) -> MethodResult {
            MethodResult::Success {
                result: call.arguments.clone(),
            }
        }
    }

    #[test]
    fn test_unknown_method_is_not_implemented() {
        let channel = MethodChannel::new("test/channel");
        let result = channel.invoke(&MethodCall::new("copyImage", None));
        assert_eq!(result, MethodResult::NotImplemented);
    }

    #[test]
    fn test_handler_registered_for_each_method() {
        let mut channel = MethodChannel::new("test/channel");
        channel.register(Arc::new(Echo));

        assert_eq!(channel.methods(), vec!["echo", "ping"]);
        assert_eq!(
            channel.invoke(&MethodCall::new("ping", Some(json!(1)))),
            MethodResult::Success {
                result: Some(json!(1))
            }
        );
    }

    #[test]
    fn test_string_argument_lookup() {
        let call = MethodCall::new("m", Some(json!({"path": "/a.png", "n": 3})));
        assert_eq!(call.string_argument("path"), Some("/a.png"));
        assert_eq!(call.string_argument("n"), None);
        assert_eq!(call.string_argument("missing"), None);

        let not_a_map = MethodCall::new("m", Some(json!(["/a.png"])));
        assert_eq!(not_a_map.string_argument("path"), None);
        assert_eq!(MethodCall::new("m", None).string_argument("path"), None);
    }

    #[test]
    fn test_result_wire_shape() {
        assert_eq!(
            serde_json::to_value(MethodResult::success()).unwrap(),
            json!({"status": "success", "result": null})
        );
        assert_eq!(
            serde_json::to_value(MethodResult::NotImplemented).unwrap(),
            json!({"status": "notImplemented"})
        );
        assert_eq!(
            serde_json::to_value(MethodResult::error(BridgeError::new("E", "m"))).unwrap(),
            json!({"status": "error", "error": {"code": "E", "message": "m", "details": null}})
        );
    }
}
