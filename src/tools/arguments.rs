//! Typed access to tool call arguments.

use crate::error::DeepSearchError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, DeepSearchError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                DeepSearchError::InvalidArgument(format!("Missing string argument: {key}"))
            })
    }

    /// Get a string-array argument by key.
    pub fn get_str_array(&self, key: &str) -> Result<Vec<String>, DeepSearchError> {
        let items = self
            .value
            .get(key)
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                DeepSearchError::InvalidArgument(format!("Missing array argument: {key}"))
            })?;
        items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    DeepSearchError::InvalidArgument(format!(
                        "Argument '{key}' must contain only strings"
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_str_returns_present_string() {
        let args = ToolArguments::new(serde_json::json!({"query": "rust"}));
        assert_eq!(args.get_str("query").unwrap(), "rust");
    }

    #[test]
    fn get_str_rejects_missing_or_wrong_type() {
        let args = ToolArguments::new(serde_json::json!({"query": 7}));
        assert!(args.get_str("query").is_err());
        assert!(args.get_str("absent").is_err());
    }

    #[test]
    fn get_str_array_rejects_mixed_types() {
        let args = ToolArguments::new(serde_json::json!({"urls": ["https://a", 3]}));
        assert!(args.get_str_array("urls").is_err());
    }
}
