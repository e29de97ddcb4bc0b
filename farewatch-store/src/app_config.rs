use config::builder::{ConfigBuilder, DefaultState};
use farewatch_core::{CoreResult, FillPolicy};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub assistant: AssistantConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl GeminiConfig {
    /// The API key, or `None` when it is unset or blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    pub fill_default_route: bool,
    pub default_origin: String,
    pub default_destination: String,
    pub history_window: usize,
    pub rng_seed: Option<u64>,
}

impl AssistantConfig {
    pub fn fill_policy(&self) -> CoreResult<FillPolicy> {
        if self.fill_default_route {
            FillPolicy::default_route(&self.default_origin, &self.default_destination)
        } else {
            Ok(FillPolicy::Clarify)
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // FAREWATCH__GEMINI__MODEL=... sets gemini.model
            .add_source(
                config::Environment::with_prefix("FAREWATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("gemini.api_key", env::var("GEMINI_API_KEY").ok())?;

        Self::from_builder(builder)
    }

    /// Built-in defaults under whatever sources `builder` already carries.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("gemini.model", "gemini-1.5-pro-latest")?
            .set_default("gemini.base_url", "https://generativelanguage.googleapis.com")?
            .set_default("gemini.timeout_seconds", 8)?
            .set_default("assistant.fill_default_route", true)?
            .set_default("assistant.default_origin", "New York")?
            .set_default("assistant.default_destination", "London")?
            .set_default("assistant.history_window", 10)?
            .build()?
            .try_deserialize()
    }
}
