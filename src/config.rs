use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub places: PlacesConfig,

    pub line: LineConfig,

    pub openai: OpenAiConfig,

    pub search: SearchConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    #[serde(default)]
    pub suppress_connection_errors: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            suppress_connection_errors: false,
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Externally reachable base URL of this server.
    /// LINE fetches card images from here, so without it cards fall back to a
    /// placeholder image.
    pub public_base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            cors_allowed_origins: vec!["*".to_string()],
            public_base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub api_key: Option<String>,

    pub nearby_url: String,

    pub details_url: String,

    pub photo_url: String,

    pub language: String,

    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            nearby_url: "https://maps.googleapis.com/maps/api/place/nearbysearch/json"
                .to_string(),
            details_url: "https://maps.googleapis.com/maps/api/place/details/json".to_string(),
            photo_url: "https://maps.googleapis.com/maps/api/place/photo".to_string(),
            language: "ja".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub channel_access_token: Option<String>,

    pub push_url: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_access_token: None,
            push_url: "https://api.line.me/v2/bot/message/push".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub enabled: bool,

    pub api_key: Option<String>,

    pub model: String,

    pub responses_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            responses_url: "https://api.openai.com/v1/responses".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Keyword sent to the places provider.
    pub keyword: String,

    /// A text message containing this word starts the location flow.
    pub trigger_word: String,

    pub item_limit: usize,

    /// How many of the leading shops get an AI review summary.
    pub enrich_top: usize,

    pub reviews_per_place: usize,

    pub min_review_rating: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keyword: "ラーメン".to_string(),
            trigger_word: "ラーメン".to_string(),
            item_limit: 10,
            enrich_top: 3,
            reviews_per_place: 5,
            min_review_rating: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    pub fn load() -> Result<Self> {
        // A missing .env is normal outside development.
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    /// Secrets usually come from the environment rather than the file.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GOOGLE_PLACES_API_KEY") {
            self.places.api_key = Some(key);
        }
        if let Some(token) = non_empty("LINE_CHANNEL_ACCESS_TOKEN") {
            self.line.channel_access_token = Some(token);
        }
        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.openai.api_key = Some(key);
        }
        if let Some(base) = non_empty("PUBLIC_BASE_URL") {
            self.server.public_base_url = Some(base);
        }
        if let Some(port) = non_empty("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("ramen-bot").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".ramen-bot").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(base) = &self.server.public_base_url {
            url::Url::parse(base)
                .with_context(|| format!("Invalid public_base_url: {base}"))?;
        }

        if self.search.item_limit == 0 {
            anyhow::bail!("search.item_limit must be > 0");
        }

        if self.places.request_timeout_seconds == 0 {
            anyhow::bail!("places.request_timeout_seconds must be > 0");
        }

        Ok(())
    }

    /// `public_base_url` without a trailing slash, if set and non-empty.
    #[must_use]
    pub fn public_base_url(&self) -> Option<&str> {
        self.server
            .public_base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .filter(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.search.item_limit, 10);
        assert_eq!(config.search.enrich_top, 3);
        assert_eq!(config.places.request_timeout_seconds, 10);
        assert!(config.places.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[places]"));
        assert!(toml_str.contains("[search]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [search]
            item_limit = 5
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.search.item_limit, 5);

        assert_eq!(config.search.keyword, "ラーメン");
        assert_eq!(config.line.push_url, "https://api.line.me/v2/bot/message/push");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GOOGLE_PLACES_API_KEY", "places-key"),
            ("LINE_CHANNEL_ACCESS_TOKEN", "line-token"),
            ("OPENAI_API_KEY", "   "),
            ("PUBLIC_BASE_URL", "https://bot.example.com/"),
            ("PORT", "9090"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_overrides(|name| env.get(name).map(|v| (*v).to_string()));

        assert_eq!(config.places.api_key.as_deref(), Some("places-key"));
        assert_eq!(config.line.channel_access_token.as_deref(), Some("line-token"));
        assert!(config.openai.api_key.is_none());
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.public_base_url(), Some("https://bot.example.com"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.server.public_base_url = Some("not a url".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.item_limit = 0;
        assert!(config.validate().is_err());
    }
}
