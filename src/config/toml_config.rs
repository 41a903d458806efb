use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LeiError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://api.gleif.org/api/v1";
/// Largest `page[size]` the GLEIF API accepts; also caps LEI codes per batch.
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub lookup: LookupSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupSettings {
    #[serde(default = "default_page_size")]
    pub batch_size: usize,
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}

fn default_concurrent_requests() -> usize {
    5
}

fn default_max_pages() -> usize {
    50
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            batch_size: default_page_size(),
            concurrent_requests: default_concurrent_requests(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

impl LookupConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LeiError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LeiError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LeiError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("api.base_url", &self.api.base_url)?;
        validate_positive_number("api.timeout_seconds", self.api.timeout_seconds as usize, 1)?;
        validate_non_empty_string("api.user_agent", &self.api.user_agent)?;

        validate_lookup_settings(self)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }
}

/// Request-shaping limits, checked for any provider before a client is built.
/// GLEIF rejects or truncates pages above [`MAX_PAGE_SIZE`].
pub fn validate_lookup_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    use crate::utils::validation::{validate_positive_number, validate_range};

    validate_range("lookup.batch_size", config.batch_size(), 1, MAX_PAGE_SIZE)?;
    validate_range("lookup.page_size", config.page_size(), 1, MAX_PAGE_SIZE)?;
    validate_range("lookup.concurrent_requests", config.concurrent_requests(), 1, 64)?;
    validate_positive_number("lookup.max_pages", config.max_pages(), 1)?;

    Ok(())
}

impl ConfigProvider for LookupConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds
    }

    fn user_agent(&self) -> &str {
        &self.api.user_agent
    }

    fn batch_size(&self) -> usize {
        self.lookup.batch_size
    }

    fn concurrent_requests(&self) -> usize {
        self.lookup.concurrent_requests
    }

    fn page_size(&self) -> usize {
        self.lookup.page_size
    }

    fn max_pages(&self) -> usize {
        self.lookup.max_pages
    }
}

impl Validate for LookupConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[api]
base_url = "https://registry.example.com/api/v1"
timeout_seconds = 10
user_agent = "test-agent/1.0"

[lookup]
batch_size = 50
concurrent_requests = 2
page_size = 100
max_pages = 3
"#;

        let config = LookupConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), "https://registry.example.com/api/v1");
        assert_eq!(config.timeout_seconds(), 10);
        assert_eq!(config.user_agent(), "test-agent/1.0");
        assert_eq!(config.batch_size(), 50);
        assert_eq!(config.concurrent_requests(), 2);
        assert_eq!(config.page_size(), 100);
        assert_eq!(config.max_pages(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = LookupConfig::from_toml_str("").unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout_seconds(), 30);
        assert_eq!(config.batch_size(), MAX_PAGE_SIZE);
        assert_eq!(config.concurrent_requests(), 5);
        assert_eq!(config.max_pages(), 50);
        assert!(config.user_agent().starts_with("lei-lookup/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LEI_LOOKUP_TEST_BASE_URL", "https://mirror.example.org/v1");

        let toml_content = r#"
[api]
base_url = "${LEI_LOOKUP_TEST_BASE_URL}"
"#;

        let config = LookupConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, "https://mirror.example.org/v1");

        std::env::remove_var("LEI_LOOKUP_TEST_BASE_URL");
    }

    #[test]
    fn test_unset_env_var_left_in_place() {
        let toml_content = r#"
[api]
user_agent = "${LEI_LOOKUP_TEST_SURELY_UNSET}"
"#;

        let config = LookupConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.user_agent, "${LEI_LOOKUP_TEST_SURELY_UNSET}");
    }

    #[test]
    fn test_config_validation() {
        let invalid_url = LookupConfig::from_toml_str(
            r#"
[api]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(invalid_url.validate().is_err());

        let oversized_batch = LookupConfig::from_toml_str(
            r#"
[lookup]
batch_size = 500
"#,
        )
        .unwrap();
        assert!(oversized_batch.validate().is_err());

        let no_concurrency = LookupConfig::from_toml_str(
            r#"
[lookup]
concurrent_requests = 0
"#,
        )
        .unwrap();
        assert!(no_concurrency.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = LookupConfig::from_toml_str("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, LeiError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[lookup]
concurrent_requests = 8
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = LookupConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.concurrent_requests(), 8);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }
}
