use serde::Deserialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// The single browser origin allowed to call the relay.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Full URL of the chat-completion endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Language the model is asked to answer in; substituted for `{language}`.
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
    #[serde(default = "default_start_analysis")]
    pub start_analysis: EndpointConfig,
    #[serde(default = "default_analyze")]
    pub analyze: EndpointConfig,
    #[serde(default = "default_optimize")]
    pub optimize: EndpointConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub system_prompt: String,
    pub temperature: f64,
    pub timeout_secs: u64,
    #[serde(default)]
    pub retries: u32,
}

/// Client-facing error strings.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_missing_prompt")]
    pub missing_prompt: String,
    /// `{max}` is replaced with the configured character limit.
    #[serde(default = "default_prompt_too_long")]
    pub prompt_too_long: String,
    #[serde(default = "default_invalid_request")]
    pub invalid_request: String,
    #[serde(default = "default_timeout")]
    pub timeout: String,
    #[serde(default = "default_upstream_error")]
    pub upstream_error: String,
    #[serde(default = "default_server_error")]
    pub server_error: String,
    #[serde(default = "default_not_found")]
    pub not_found: String,
    #[serde(default = "default_method_not_allowed")]
    pub method_not_allowed: String,
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn instruction(&self, language: &str) -> String {
        self.system_prompt.replace("{language}", language)
    }
}

impl MessagesConfig {
    pub fn prompt_too_long(&self, max: usize) -> String {
        self.prompt_too_long.replace("{max}", &max.to_string())
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: default_allowed_origin(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: String::new(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            max_prompt_chars: default_max_prompt_chars(),
            start_analysis: default_start_analysis(),
            analyze: default_analyze(),
            optimize: default_optimize(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            missing_prompt: default_missing_prompt(),
            prompt_too_long: default_prompt_too_long(),
            invalid_request: default_invalid_request(),
            timeout: default_timeout(),
            upstream_error: default_upstream_error(),
            server_error: default_server_error(),
            not_found: default_not_found(),
            method_not_allowed: default_method_not_allowed(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_allowed_origin() -> String {
    "http://localhost:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_endpoint() -> String {
    "https://api.deepseek.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_language() -> String {
    "Hungarian".to_string()
}

fn default_max_prompt_chars() -> usize {
    1000
}

fn default_start_analysis() -> EndpointConfig {
    EndpointConfig {
        system_prompt: "Generate the first clarifying question to optimize this prompt:"
            .to_string(),
        temperature: 0.7,
        timeout_secs: 60,
        retries: 0,
    }
}

fn default_analyze() -> EndpointConfig {
    EndpointConfig {
        system_prompt: "Analyze the prompt. Give suggestions how to enhance it to be the best AI optimized prompt! Give the answer in {language}!".to_string(),
        temperature: 0.5,
        timeout_secs: 60,
        retries: 3,
    }
}

fn default_optimize() -> EndpointConfig {
    EndpointConfig {
        system_prompt:
            "Optimize the prompt to be the best AI optimized prompt! Give the answer in {language}!"
                .to_string(),
        temperature: 0.5,
        timeout_secs: 30,
        retries: 0,
    }
}

fn default_missing_prompt() -> String {
    "Missing prompt in request".to_string()
}

fn default_prompt_too_long() -> String {
    "A prompt maximum {max} karakter lehet!".to_string()
}

fn default_invalid_request() -> String {
    "Érvénytelen kérés: JSON törzs szükséges.".to_string()
}

fn default_timeout() -> String {
    "Időtúllépés az API hívásnál. Kérjük próbáld újra később.".to_string()
}

fn default_upstream_error() -> String {
    "API hiba történt. Kérjük ellenőrizd a kapcsolatot.".to_string()
}

fn default_server_error() -> String {
    "Belső szerverhiba".to_string()
}

fn default_not_found() -> String {
    "Nem található".to_string()
}

fn default_method_not_allowed() -> String {
    "A metódus nem engedélyezett".to_string()
}
