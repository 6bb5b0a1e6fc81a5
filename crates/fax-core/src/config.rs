//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. fax-gateway.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。
//! Configuration is resolved once by the binary and then passed into
//! tool constructors; nothing here is consulted during a tool call.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

/// Default config file name looked up by [`Config::load`]
pub const CONFIG_FILE: &str = "fax-gateway.toml";

/// Fax.Plus API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct FaxPlusConfig {
    /// Personal access token sent as a bearer token
    pub api_key: String,

    /// Account (user) identifier, `self` for the token owner
    pub account_id: String,

    /// REST API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional HTTP timeout; unset means the caller owns timeouts
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Largest document accepted before upload
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

impl Default for FaxPlusConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            account_id: String::new(),
            base_url: default_base_url(),
            timeout_secs: None,
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

impl std::fmt::Debug for FaxPlusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaxPlusConfig")
            .field("api_key", &"[REDACTED]")
            .field("account_id", &self.account_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_file_size_mb", &self.max_file_size_mb)
            .finish()
    }
}

impl FaxPlusConfig {
    /// Maximum document size in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

fn default_base_url() -> String {
    "https://restapi.fax.plus/v3".to_string()
}

fn default_max_file_size_mb() -> u64 {
    20
}

/// Main configuration for fax-gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fax.Plus configuration
    #[serde(default)]
    pub faxplus: FaxPlusConfig,
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // '{' を消費

                let mut var_name = String::new();
                while let Some(c) = chars.next() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// 設定ファイル内の `${VAR_NAME}` は環境変数の値に置換され、
    /// その後 `FAXPLUS_*` 環境変数で上書きされます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        Self::from_toml_file_with(path.as_ref(), |key| std::env::var(key).ok())
    }

    fn from_toml_file_with<F>(path: &Path, lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&toml_content)?;
        cfg.apply_overrides_from(lookup);
        cfg.validate()?;

        Ok(cfg)
    }

    /// Parse a TOML document, expanding `${VAR}` references first
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded = Self::expand_env_vars(content);

        let toml: TomlConfig = toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        Ok(Self::from_toml_config(toml))
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./fax-gateway.toml` があればそれを使い、
    /// 見つからない場合は環境変数のみから構築します。
    pub fn load() -> crate::Result<Self> {
        Self::load_with(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
    }

    fn load_with<F>(path: &Path, lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if path.exists() {
            return Self::from_toml_file_with(path, lookup);
        }

        Self::from_env_with(lookup)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> crate::Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    fn from_env_with<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        cfg.apply_overrides_from(lookup);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_toml_config(toml: TomlConfig) -> Self {
        let fax = toml.faxplus.unwrap_or_default();

        Self {
            faxplus: FaxPlusConfig {
                api_key: fax.api_key.unwrap_or_default(),
                account_id: fax.account_id.unwrap_or_default(),
                base_url: fax.base_url.unwrap_or_else(default_base_url),
                timeout_secs: fax.timeout_secs,
                max_file_size_mb: fax.max_file_size_mb.unwrap_or_else(default_max_file_size_mb),
            },
        }
    }

    /// 環境変数で設定を上書きする
    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("FAXPLUS_API_KEY") {
            self.faxplus.api_key = api_key;
        }
        if let Some(account_id) = lookup("FAXPLUS_ACCOUNT_ID") {
            self.faxplus.account_id = account_id;
        }
        if let Some(base_url) = lookup("FAXPLUS_BASE_URL") {
            self.faxplus.base_url = base_url;
        }
        if let Some(timeout) = lookup("FAXPLUS_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.faxplus.timeout_secs = Some(timeout);
        }
        if let Some(size) = lookup("FAXPLUS_MAX_FILE_SIZE_MB").and_then(|v| v.parse().ok()) {
            self.faxplus.max_file_size_mb = size;
        }
    }

    /// Check that the credentials are present
    pub fn validate(&self) -> crate::Result<()> {
        if self.faxplus.api_key.trim().is_empty() {
            return Err(Error::Config(
                "FAXPLUS_API_KEY (or [faxplus].api_key) is required".to_string(),
            ));
        }
        if self.faxplus.account_id.trim().is_empty() {
            return Err(Error::Config(
                "FAXPLUS_ACCOUNT_ID (or [faxplus].account_id) is required".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// TOML 構造体定義（ファイル解析用）
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    faxplus: Option<TomlFaxPlusConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlFaxPlusConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    account_id: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    max_file_size_mb: Option<u64>,
}
