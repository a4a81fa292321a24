use crate::constants::{
    ANALYZE_PATH, API_URL_ENV, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT, REQUEST_TIMEOUT_ENV,
    THEME_ENV,
};
use crate::presenter::Theme;
use std::time::Duration;

/// Runtime configuration, resolved once at startup and passed down.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the analysis service, without a trailing slash.
    pub api_base_url: String,
    /// Upper bound on one analysis exchange.
    pub request_timeout: Duration,
    /// Explicit theme choice; `None` follows the desktop colour scheme.
    pub theme: Option<Theme>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            theme: None,
        }
    }
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_ENV) {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() {
                tracing::warn!("{} is blank; using {}", API_URL_ENV, DEFAULT_API_BASE_URL);
            } else {
                config.api_base_url = url.to_string();
            }
        }

        if let Some(raw) = lookup(REQUEST_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    "Ignoring invalid {}={:?}; using {}s",
                    REQUEST_TIMEOUT_ENV,
                    raw,
                    DEFAULT_REQUEST_TIMEOUT.as_secs()
                ),
            }
        }

        if let Some(raw) = lookup(THEME_ENV) {
            match raw.parse::<Theme>() {
                Ok(theme) => config.theme = Some(theme),
                Err(e) => tracing::warn!("Ignoring {}: {}", THEME_ENV, e),
            }
        }

        config
    }

    /// Full URL of the analysis endpoint.
    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.api_base_url, ANALYZE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.analyze_url(), "http://localhost:8000/analyze");
    }

    #[test]
    fn test_base_url_override_trims_trailing_slash() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            API_URL_ENV,
            "https://vision.example.com/",
        )]));
        assert_eq!(config.api_base_url, "https://vision.example.com");
        assert_eq!(config.analyze_url(), "https://vision.example.com/analyze");
    }

    #[test]
    fn test_blank_base_url_falls_back() {
        let config = AppConfig::from_lookup(lookup_from(&[(API_URL_ENV, "   ")]));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_timeout_override() {
        let config = AppConfig::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_ENV, "15")]));
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        for raw in ["0", "soon", "-3"] {
            let config = AppConfig::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_ENV, raw)]));
            assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        }
    }

    #[test]
    fn test_theme_override() {
        let config = AppConfig::from_lookup(lookup_from(&[(THEME_ENV, "Dark")]));
        assert_eq!(config.theme, Some(Theme::Dark));

        let config = AppConfig::from_lookup(lookup_from(&[(THEME_ENV, "neon")]));
        assert_eq!(config.theme, None);
    }
}
