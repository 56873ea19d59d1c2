use config::{Config as ConfigLoader, ConfigError, Environment, File};
use parley_llm::{DispatchConfig, ProviderEndpoints, ProviderId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub dispatch: DispatchSettings,
    pub logging: LoggingConfig,

    /// Registrations with these emails get the admin role
    #[serde(default)]
    pub admin_emails: Vec<String>,

    /// Operator-wide provider keys, keyed by provider id
    #[serde(default)]
    pub providers: BTreeMap<String, String>,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    150
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub database: String,
    /// JSON file for dev-mode credentials; in memory when unset
    #[serde(default)]
    pub local_credentials_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    pub simulated_delay_ms: u64,
    pub provider_timeout_secs: u64,
    pub endpoints: ProviderEndpoints,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        let defaults = DispatchConfig::default();
        Self {
            simulated_delay_ms: defaults.simulated_delay.as_millis() as u64,
            provider_timeout_secs: defaults.request_timeout.as_secs(),
            endpoints: defaults.endpoints,
        }
    }
}

impl From<&DispatchSettings> for DispatchConfig {
    fn from(settings: &DispatchSettings) -> Self {
        DispatchConfig::new()
            .with_simulated_delay(Duration::from_millis(settings.simulated_delay_ms))
            .with_request_timeout(Duration::from_secs(settings.provider_timeout_secs))
            .with_endpoints(settings.endpoints.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables, `PARLEY_` prefix with `__` between sections
    ///    (`PARLEY_SERVER__PORT=9000`, `PARLEY_LOGGING__FORMAT=json`)
    ///
    /// `MONGODB_URI` and `PROVIDER_KEYS_<ID>` are only read from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("PARLEY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        cfg.mongodb_uri = std::env::var("MONGODB_URI")
            .ok()
            .filter(|uri| !uri.trim().is_empty());
        cfg.merge_env_provider_keys(|name| std::env::var(name).ok());

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));
        builder.build()?.try_deserialize()
    }

    /// `PROVIDER_KEYS_OPENAI`, `PROVIDER_KEYS_GEMINI`, ... override `[providers]`
    pub fn merge_env_provider_keys(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for provider in ProviderId::ALL {
            let name = format!("PROVIDER_KEYS_{}", provider.as_str().to_uppercase());
            if let Some(key) = lookup(&name).filter(|k| !k.trim().is_empty()) {
                self.providers.insert(provider.as_str().to_string(), key);
            }
        }
    }

    /// Operator-configured key for `provider`
    pub fn provider_key(&self, provider: ProviderId) -> Option<&str> {
        self.providers
            .get(provider.as_str())
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email.trim()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}
