use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known extended data keys.
pub mod keys {
    /// Captured total so far; `-1` until the first successful capture.
    pub const CAPTURE_AMOUNT: &str = "captureAmount";
    /// Serialized `ProcessorSettings` stored on the gateway provider.
    pub const PROCESSOR_SETTINGS: &str = "processorSettings";
    /// Transaction identifier assigned by the gateway on initialization.
    pub const GATEWAY_TRANSACTION_ID: &str = "gatewayTransactionId";
    /// Where the shopper is sent to complete the iframe flow.
    pub const REDIRECT_URL: &str = "redirectUrl";
}

/// Free-form string map for processor-specific metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtendedData(BTreeMap<String, String>);

impl ExtendedData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtendedData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Arguments handed through to the processor untouched.
pub type ProcessorArgs = ExtendedData;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_overwrites() {
        let mut data = ExtendedData::new();
        data.set_value(keys::CAPTURE_AMOUNT, "-1");
        data.set_value(keys::CAPTURE_AMOUNT, "60.00");
        assert_eq!(data.get_value(keys::CAPTURE_AMOUNT), Some("60.00"));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let data: ExtendedData = [("a", "1")].into_iter().collect();
        assert_eq!(serde_json::to_string(&data).unwrap(), r#"{"a":"1"}"#);
    }
}
