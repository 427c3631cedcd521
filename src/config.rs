use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key. Without it every catalog call yields no data.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,

    /// Locale sent with catalog calls unless the caller overrides it
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Comma-separated CORS origin allow-list
    #[serde(default)]
    pub allowed_origins: Option<String>,

    /// Path to the serialized sentiment classifier
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Path to the serialized text vectorizer
    #[serde(default = "default_vectorizer_path")]
    pub vectorizer_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_model_path() -> String {
    "sentiment_model.json".to_string()
}

fn default_vectorizer_path() -> String {
    "vectorizer.json".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7860
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// API key with blank values treated as absent
    pub fn api_key(&self) -> Option<String> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    /// Parsed CORS allow-list. `None` means any origin is accepted.
    pub fn cors_origins(&self) -> Option<Vec<String>> {
        let raw = self.allowed_origins.as_deref()?;
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            None
        } else {
            Some(origins)
        }
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: Vec<(&str, &str)>) -> Config {
        envy::from_iter(
            vars.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config_from(vec![]);
        assert_eq!(config.tmdb_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_language, "en-US");
        assert_eq!(config.bind_addr(), "0.0.0.0:7860");
        assert_eq!(config.model_path, "sentiment_model.json");
        assert_eq!(config.vectorizer_path, "vectorizer.json");
        assert!(config.api_key().is_none());
        assert!(config.cors_origins().is_none());
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let config = config_from(vec![("TMDB_API_KEY", "   ")]);
        assert!(config.api_key().is_none());

        let config = config_from(vec![("TMDB_API_KEY", "abc123")]);
        assert_eq!(config.api_key(), Some("abc123".to_string()));
    }

    #[test]
    fn test_cors_origins_are_trimmed() {
        let config = config_from(vec![(
            "ALLOWED_ORIGINS",
            "https://a.example, https://b.example ,",
        )]);
        assert_eq!(
            config.cors_origins(),
            Some(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    fn test_cors_wildcard_allows_any() {
        let config = config_from(vec![("ALLOWED_ORIGINS", "*")]);
        assert!(config.cors_origins().is_none());
    }

    #[test]
    fn test_port_override() {
        let config = config_from(vec![("HOST", "127.0.0.1"), ("PORT", "3000")]);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }
}
