use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub appdir: Option<String>,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

/// Movie catalog provider. The api key is the TMDB "read access token",
/// sent as a bearer credential.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub apikey: Option<String>,
    #[serde(default = "default_tmdb_baseurl")]
    pub baseurl: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            apikey: None,
            baseurl: default_tmdb_baseurl(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub apikey: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_baseurl")]
    pub baseurl: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            apikey: None,
            model: default_gemini_model(),
            baseurl: default_gemini_baseurl(),
            temperature: default_temperature(),
        }
    }
}

fn default_port() -> String {
    "3000".to_string()
}

fn default_tmdb_baseurl() -> String {
    "https://api.themoviedb.org/3/".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_baseurl() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(&content).map_err(|e| ConfigError::ParseError(path.to_string(), e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is a valid, all-defaults config.
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content)
    }

    /// Credentials from the environment take precedence over the file.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(TMDB_API_KEY_ENV).ok(),
            std::env::var(GEMINI_API_KEY_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, tmdb: Option<String>, gemini: Option<String>) {
        if let Some(key) = tmdb.filter(|k| !k.trim().is_empty()) {
            self.tmdb.apikey = Some(key);
        }
        if let Some(key) = gemini.filter(|k| !k.trim().is_empty()) {
            self.gemini.apikey = Some(key);
        }
    }

    /// Catalog base address, always ending in `/` so routes resolve below it.
    pub fn tmdb_base_url(&self) -> Result<Url, ConfigError> {
        let mut base = self.tmdb.baseurl.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let url = Url::parse(&base)
            .map_err(|e| ConfigError::InvalidUrl("tmdb.baseurl".to_string(), e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(
                "tmdb.baseurl".to_string(),
                "not a base URL".to_string(),
            ));
        }
        Ok(url)
    }

    pub fn tmdb_token(&self) -> Option<&str> {
        non_blank(self.tmdb.apikey.as_deref())
    }

    pub fn gemini_key(&self) -> Option<&str> {
        non_blank(self.gemini.apikey.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("Invalid URL in {0}: {1}")]
    InvalidUrl(String, String),
}
