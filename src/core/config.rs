use std::env;
use std::fmt;

pub const DEFAULT_OPENAI_API_HOSTNAME: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 500;

#[derive(Clone)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    // `None` when the credential was not provided. Requests still get
    // served and fail with a configuration error.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub max_tokens: u32,
}

impl AppConfig {
    /// Build the config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup so callers (and
    /// tests) don't need to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_hostname = lookup("RELAY_OPENAI_API_HOST")
            .unwrap_or_else(|| DEFAULT_OPENAI_API_HOSTNAME.to_string());
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty());
        let openai_model =
            lookup("RELAY_OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
        let max_tokens = lookup("RELAY_MAX_TOKENS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        Self {
            openai_api_hostname,
            openai_api_key,
            openai_model,
            max_tokens,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_hostname", &self.openai_api_hostname)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openai_model", &self.openai_model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.openai_api_hostname, "https://api.openai.com");
        assert_eq!(config.openai_model, "gpt-3.5-turbo");
        assert_eq!(config.max_tokens, 500);
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("RELAY_OPENAI_API_HOST", "http://localhost:8080"),
            ("RELAY_OPENAI_MODEL", "gpt-4o-mini"),
            ("RELAY_MAX_TOKENS", "128"),
        ]);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai_api_hostname, "http://localhost:8080");
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 128);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = config_from(&[("OPENAI_API_KEY", "  ")]);
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_bad_max_tokens_falls_back() {
        let config = config_from(&[("RELAY_MAX_TOKENS", "lots")]);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-secret")]);
        let out = format!("{:?}", config);
        assert!(!out.contains("sk-secret"));
        assert!(out.contains("<redacted>"));
    }
}
