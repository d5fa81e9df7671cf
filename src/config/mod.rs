mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::{debug, warn};

pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// Loads `$CONFIG_PATH` (default `config.yaml`), applies environment
/// overrides and validates the result.
pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    load_from(&config_path, |key| env::var(key).ok()).await
}

pub async fn load_from<F>(config_path: &str, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    debug!("Loading configuration from: {}", config_path);

    let mut config = match tokio::fs::read_to_string(config_path).await {
        Ok(config_str) => parse(&config_str)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("{} not found, using built-in defaults", config_path);
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    config.apply_overrides(lookup)?;
    config.validate()?;

    Ok(config)
}

pub fn parse(config_str: &str) -> Result<Config> {
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}

impl Config {
    /// Overlays values from the environment. `lookup` is `std::env::var` in
    /// production and a map in tests.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV) {
            self.upstream.api_key = key;
        }
        if let Some(host) = lookup("RELAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RELAY_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::config(format!("RELAY_PORT is not a valid port: {port}")))?;
        }
        if let Some(origin) = lookup("RELAY_ALLOWED_ORIGIN") {
            self.server.allowed_origin = origin;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.upstream.api_key.trim().is_empty() {
            return Err(Error::config(format!(
                "no upstream API key configured; set {API_KEY_ENV}"
            )));
        }
        if self.upstream.endpoint.trim().is_empty() {
            return Err(Error::config("upstream.endpoint must not be empty"));
        }
        if self.relay.max_prompt_chars == 0 {
            return Err(Error::config("relay.max_prompt_chars must be positive"));
        }
        if axum::http::HeaderValue::from_str(&self.server.allowed_origin).is_err() {
            return Err(Error::config(format!(
                "server.allowed_origin is not a valid header value: {}",
                self.server.allowed_origin
            )));
        }

        let endpoints = [
            ("start_analysis", &self.relay.start_analysis),
            ("analyze", &self.relay.analyze),
            ("optimize", &self.relay.optimize),
        ];
        for (name, endpoint) in endpoints {
            if !(0.0..=2.0).contains(&endpoint.temperature) {
                return Err(Error::config(format!(
                    "relay.{name}.temperature must be within 0..=2, got {}",
                    endpoint.temperature
                )));
            }
            if endpoint.timeout_secs == 0 {
                return Err(Error::config(format!(
                    "relay.{name}.timeout_secs must be positive"
                )));
            }
        }

        Ok(())
    }
}
