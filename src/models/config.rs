//! Configuration model loaded from external sources.

use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::filter::validate_filter_clause;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

/// Minimum length accepted by `actix_web::cookie::Key::from`.
pub const MIN_SECRET_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base filter: {0}")]
    BaseFilter(String),

    #[error("search base cannot be empty")]
    EmptySearchBase,

    #[error("public url cannot be empty")]
    EmptyPublicUrl,

    #[error("secret must be at least {MIN_SECRET_LEN} bytes long")]
    ShortSecret,
}

#[derive(Clone, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Externally reachable base URL phones use for follow-up requests.
    pub public_url: String,
    pub templates_dir: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Cookie signing key; a random key is generated when absent.
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    #[serde(default)]
    pub show_error_detail: bool,
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub push: Option<PushConfig>,
}

#[derive(Clone, Deserialize)]
/// LDAP connection and query policy.
pub struct DirectoryConfig {
    pub address: String,
    #[serde(default = "default_ldap_port")]
    pub port: u16,
    pub search_base: String,
    /// Pre-validated clause ANDed into every query, e.g. `(objectClass=person)`.
    pub base_filter: String,
    #[serde(default)]
    pub bind_dn: Option<String>,
    #[serde(default)]
    pub bind_password: Option<String>,
    #[serde(default = "default_true")]
    pub allow_empty_search: bool,
    #[serde(default = "default_results_per_page")]
    pub results_per_page: NonZeroUsize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Clone, Deserialize)]
/// Target phone for the `push_init` utility.
pub struct PushConfig {
    pub phone_address: String,
    pub user_name: String,
    pub user_password: String,
    #[serde(default = "default_push_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Layers `config/default.yaml`, `config/<APP_ENV>.yaml` and `APP_*`
/// environment variables (`__` separates nested keys).
pub fn load_settings() -> Result<config::Config, config::ConfigError> {
    // Select config profile (defaults to `local`).
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    config::Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
}

fn default_static_dir() -> String {
    "./public".to_string()
}

fn default_session_ttl_secs() -> u64 {
    1800
}

fn default_ldap_port() -> u16 {
    389
}

fn default_true() -> bool {
    true
}

fn default_results_per_page() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_ITEMS_PER_PAGE).unwrap_or(NonZeroUsize::MIN)
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_push_delay_ms() -> u64 {
    1000
}

impl ServerConfig {
    /// Checks the invariants the rest of the application relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.public_url.trim().is_empty() {
            return Err(ConfigError::EmptyPublicUrl);
        }
        if self
            .secret
            .as_ref()
            .is_some_and(|secret| secret.len() < MIN_SECRET_LEN)
        {
            return Err(ConfigError::ShortSecret);
        }
        self.directory.validate()
    }

    /// URL of the listing endpoint as seen by the phone.
    pub fn list_url(&self) -> String {
        format!("{}/list", self.public_url.trim_end_matches('/'))
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl DirectoryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_base.trim().is_empty() {
            return Err(ConfigError::EmptySearchBase);
        }
        validate_filter_clause(&self.base_filter)
            .map_err(|e| ConfigError::BaseFilter(e.to_string()))
    }

    pub fn url(&self) -> String {
        format!("ldap://{}:{}", self.address, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Service credentials, only when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.bind_dn.as_deref(), self.bind_password.as_deref()) {
            (Some(dn), Some(password)) if !dn.is_empty() && !password.is_empty() => {
                Some((dn, password))
            }
            _ => None,
        }
    }

    /// Exactly one of bind DN and password is configured.
    pub fn has_partial_credentials(&self) -> bool {
        let dn = self.bind_dn.as_deref().is_some_and(|s| !s.is_empty());
        let password = self.bind_password.as_deref().is_some_and(|s| !s.is_empty());
        dn != password
    }
}

impl PushConfig {
    pub fn execute_url(&self) -> String {
        format!("http://{}/CGI/Execute", self.phone_address)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn redact(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "***")
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("public_url", &self.public_url)
            .field("templates_dir", &self.templates_dir)
            .field("static_dir", &self.static_dir)
            .field("secret", &redact(&self.secret))
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("show_error_detail", &self.show_error_detail)
            .field("directory", &self.directory)
            .field("push", &self.push)
            .finish()
    }
}

impl fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("search_base", &self.search_base)
            .field("base_filter", &self.base_filter)
            .field("bind_dn", &self.bind_dn)
            .field("bind_password", &redact(&self.bind_password))
            .field("allow_empty_search", &self.allow_empty_search)
            .field("results_per_page", &self.results_per_page)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Debug for PushConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushConfig")
            .field("phone_address", &self.phone_address)
            .field("user_name", &self.user_name)
            .field("user_password", &"***")
            .field("delay_ms", &self.delay_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
