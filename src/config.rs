use crate::domain::extended_data::{ExtendedData, keys};
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection settings for the SagePay processor.
///
/// Stored as JSON on the gateway provider's extended data under
/// `processorSettings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorSettings {
    pub vendor_name: String,
    pub encryption_password: String,
    #[serde(default)]
    pub live_mode: bool,
    pub return_url: String,
    pub abort_url: String,
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
    #[serde(default = "default_transaction_prefix")]
    pub transaction_prefix: String,
}

fn default_protocol_version() -> String {
    "3.00".to_string()
}

fn default_transaction_prefix() -> String {
    "SP".to_string()
}

impl ProcessorSettings {
    /// Settings pointing at the gateway test environment.
    pub fn sandbox() -> Self {
        Self {
            vendor_name: "sandbox".to_string(),
            encryption_password: "sandbox-password".to_string(),
            live_mode: false,
            return_url: "http://localhost/sagepay/success".to_string(),
            abort_url: "http://localhost/sagepay/abort".to_string(),
            protocol_version: default_protocol_version(),
            transaction_prefix: default_transaction_prefix(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("vendorName", &self.vendor_name),
            ("encryptionPassword", &self.encryption_password),
            ("returnUrl", &self.return_url),
            ("abortUrl", &self.abort_url),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(PaymentError::Config(format!("{name} must not be empty"))),
            None => Ok(()),
        }
    }

    /// Gateway endpoint for the configured mode.
    pub fn gateway_url(&self) -> &'static str {
        if self.live_mode {
            "https://live.sagepay.com/gateway/service/vspform-register.vsp"
        } else {
            "https://test.sagepay.com/gateway/service/vspform-register.vsp"
        }
    }
}

impl ExtendedData {
    /// Extracts and validates the processor settings stored on a provider.
    pub fn processor_settings(&self) -> Result<ProcessorSettings> {
        let json = self.get_value(keys::PROCESSOR_SETTINGS).ok_or_else(|| {
            PaymentError::Config(format!(
                "extended data has no '{}' entry",
                keys::PROCESSOR_SETTINGS
            ))
        })?;
        ProcessorSettings::from_json(json)
    }

    pub fn set_processor_settings(&mut self, settings: &ProcessorSettings) -> Result<()> {
        self.set_value(keys::PROCESSOR_SETTINGS, serde_json::to_string(settings)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_roundtrip_through_extended_data() {
        let mut data = ExtendedData::new();
        data.set_processor_settings(&ProcessorSettings::sandbox())
            .unwrap();
        assert_eq!(data.processor_settings().unwrap(), ProcessorSettings::sandbox());
    }

    #[test]
    fn test_missing_settings_is_config_error() {
        let data = ExtendedData::new();
        assert!(matches!(
            data.processor_settings(),
            Err(PaymentError::Config(_))
        ));
    }

    #[test]
    fn test_defaults_applied() {
        let json = r#"{
            "vendorName": "shop",
            "encryptionPassword": "secret",
            "returnUrl": "https://shop/ok",
            "abortUrl": "https://shop/abort"
        }"#;
        let settings = ProcessorSettings::from_json(json).unwrap();
        assert!(!settings.live_mode);
        assert_eq!(settings.protocol_version, "3.00");
        assert_eq!(settings.transaction_prefix, "SP");
    }

    #[test]
    fn test_blank_vendor_rejected() {
        let json = r#"{
            "vendorName": " ",
            "encryptionPassword": "secret",
            "returnUrl": "https://shop/ok",
            "abortUrl": "https://shop/abort"
        }"#;
        let err = ProcessorSettings::from_json(json).unwrap_err();
        assert!(err.to_string().contains("vendorName"));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        assert!(matches!(
            ProcessorSettings::from_json("{"),
            Err(PaymentError::Json(_))
        ));
    }
}
