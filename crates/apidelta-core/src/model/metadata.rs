use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fallback service name for descriptions with no identifying metadata
pub const UNKNOWN_SERVICE: &str = "unknown";

/// Free-form service attributes from a description's `metadata` block
///
/// Values are kept as raw JSON; the accessors used by the diff engine only
/// ever read string attributes (`endpointPrefix`, `serviceId`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ServiceMetadata {
    data: BTreeMap<String, serde_json::Value>,
}

impl ServiceMetadata {
    /// Create a new empty ServiceMetadata instance
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Get a string attribute, ignoring non-string values
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// Get a string attribute or the empty string
    pub fn str_or_empty(&self, key: &str) -> &str {
        self.get_str(key).unwrap_or("")
    }

    /// Service identifier: `endpointPrefix`, then `serviceId`, then `"unknown"`
    pub fn service_name(&self) -> &str {
        self.get_str("endpointPrefix")
            .or_else(|| self.get_str("serviceId"))
            .unwrap_or(UNKNOWN_SERVICE)
    }

    /// Set a value by key
    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Check if a key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Get all keys
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Get the number of metadata entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if metadata is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for ServiceMetadata {
    fn from(data: BTreeMap<String, serde_json::Value>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_str_ignores_non_strings() {
        let mut meta = ServiceMetadata::new();
        meta.set("endpointPrefix", json!("ec2"));
        meta.set("apiVersion", json!(3));

        assert_eq!(meta.get_str("endpointPrefix"), Some("ec2"));
        assert_eq!(meta.get_str("apiVersion"), None);
        assert_eq!(meta.str_or_empty("missing"), "");
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn test_deserializes_from_plain_object() {
        let meta: ServiceMetadata =
            serde_json::from_value(json!({"serviceId": "EC2", "uid": "ec2-2016-11-15"})).unwrap();
        assert_eq!(meta.get_str("serviceId"), Some("EC2"));
        assert!(meta.contains_key("uid"));
    }
}
