use anyhow::{bail, Result};
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use recordsheet_api::{Client, StaticCsrfToken};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
const DEFAULT_CONFIG_FILE: &str = "recordsheet.toml";
const CONFIG_PATH_VAR: &str = "RECORDSHEET_CONFIG";
const ENV_PREFIX: &str = "RECORDSHEET";

/// Where the server lives and how to talk to it.
///
/// Read from `recordsheet.toml` (or the file named by `RECORDSHEET_CONFIG`),
/// then from `RECORDSHEET_*` environment variables.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub app_root: String,
    #[serde(default)]
    csrf_token: Option<String>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());

        Self::build(
            Config::builder()
                .add_source(File::with_name(&path).required(false))
                .add_source(
                    Environment::with_prefix(ENV_PREFIX)
                        .prefix_separator("_")
                        .separator("__"),
                ),
        )
    }

    /// Settings from TOML text alone. Missing keys take their defaults.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("server_url", DEFAULT_SERVER_URL)?
            .set_default("app_root", "")?
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            bail!("server_url must be an http(s) URL, got '{}'", self.server_url);
        }
        if !self.app_root.is_empty() && !self.app_root.starts_with('/') {
            bail!("app_root must be empty or start with '/', got '{}'", self.app_root);
        }
        Ok(())
    }

    pub fn csrf_token(&self) -> Option<SecretString> {
        self.csrf_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::from(token.to_string()))
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.log_dir.clone().or_else(crate::logging::default_log_dir)
    }

    pub fn client(&self) -> Client {
        let client = Client::new(&self.server_url, &self.app_root);
        match self.csrf_token() {
            Some(token) => client.with_csrf_token(StaticCsrfToken::new(token.expose_secret())),
            None => client,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("server_url", &self.server_url)
            .field("app_root", &self.app_root)
            .field("csrf_token", &self.csrf_token.as_ref().map(|_| "[REDACTED]"))
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_empty_file() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
        assert_eq!(settings.app_root, "");
        assert!(settings.csrf_token().is_none());
        settings.validate().unwrap();
    }

    #[test]
    fn reads_all_keys() {
        let settings = Settings::from_toml(
            r#"
            server_url = "https://books.example.com"
            app_root = "/ledger"
            csrf_token = "s3cret"
            log_dir = "/tmp/recordsheet-logs"
            "#,
        )
        .unwrap();

        assert_eq!(settings.app_root, "/ledger");
        assert_eq!(settings.csrf_token().unwrap().expose_secret(), "s3cret");
        assert_eq!(settings.log_dir(), Some(PathBuf::from("/tmp/recordsheet-logs")));
        assert_eq!(settings.client().base_url(), "https://books.example.com/ledger");
    }

    #[test]
    fn debug_output_hides_token() {
        let settings = Settings::from_toml(r#"csrf_token = "s3cret""#).unwrap();
        let shown = format!("{:?}", settings);
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("[REDACTED]"));
    }

    #[test]
    fn rejects_bad_urls_and_roots() {
        let settings = Settings::from_toml(r#"server_url = "ftp://example.com""#).unwrap();
        assert!(settings.validate().is_err());

        let settings = Settings::from_toml(r#"app_root = "ledger""#).unwrap();
        assert!(settings.validate().is_err());
    }
}
