use config::{Config, Environment, File, FileFormat};
pub use config::ConfigError;
use serde::Deserialize;

/// Remote API connection settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    /// Header carrying the session token on authenticated requests.
    pub auth_header: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4941/api/v1".into(),
            auth_header: "X-Authorization".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct StorageSettings {
    /// Overrides the platform data directory used for durable storage.
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

impl Settings {
    /// Load settings from defaults, an optional `petitions.toml` and the
    /// environment (`PETITIONS_API__BASE_URL`, `PETITIONS_STORAGE__DIR`, ...).
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::builder()?
            .add_source(
                File::with_name("petitions.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("PETITIONS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults overlaid with an inline TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = ApiSettings::default();
        Config::builder()
            .set_default("api.base_url", defaults.base_url)?
            .set_default("api.auth_header", defaults.auth_header)?
            .set_default("api.timeout_secs", defaults.timeout_secs as i64)
    }
}
