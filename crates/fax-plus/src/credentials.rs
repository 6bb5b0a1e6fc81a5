//! Fax.Plus credential context

use std::fmt;

use fax_core::FaxPlusConfig;
use zeroize::Zeroizing;

use crate::error::{FaxError, Result};

/// API key and account id handed unchanged to every request
///
/// Immutable after construction. The key is wiped from memory on drop
/// and never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: Zeroizing<String>,
    account_id: String,
}

impl Credentials {
    /// Create credentials, rejecting blank values
    pub fn new(api_key: impl Into<String>, account_id: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let account_id = account_id.into();

        if api_key.trim().is_empty() {
            return Err(FaxError::Config("Fax.Plus API key is required".to_string()));
        }
        if account_id.trim().is_empty() {
            return Err(FaxError::Config("Fax.Plus account ID is required".to_string()));
        }

        Ok(Self {
            api_key: Zeroizing::new(api_key),
            account_id,
        })
    }

    pub fn from_config(config: &FaxPlusConfig) -> Result<Self> {
        Self::new(config.api_key.clone(), config.account_id.clone())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("account_id", &self.account_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_accessors() {
        let creds = Credentials::new("key-123", "self").unwrap();
        assert_eq!(creds.api_key(), "key-123");
        assert_eq!(creds.account_id(), "self");
    }

    #[test]
    fn test_blank_values_rejected() {
        assert!(matches!(Credentials::new("", "self"), Err(FaxError::Config(_))));
        assert!(matches!(Credentials::new("key", "  "), Err(FaxError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let creds = Credentials::new("key-123", "acct").unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("key-123"));
        assert!(debug.contains("acct"));
    }

    #[test]
    fn test_from_config() {
        let config = FaxPlusConfig {
            api_key: "k".to_string(),
            account_id: "a".to_string(),
            ..Default::default()
        };
        let creds = Credentials::from_config(&config).unwrap();
        assert_eq!(creds, Credentials::new("k", "a").unwrap());
    }
}
