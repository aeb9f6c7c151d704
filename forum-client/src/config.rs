use crate::error::ForumClientError;
use forum_core::DEFAULT_PAGE_SIZE;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server origin without the `/api` prefix.
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Reads `FORUM_*` variables, loading `.env` first when present.
    pub fn from_env() -> Result<Self, ForumClientError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ForumClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("FORUM_API_URL").unwrap_or(defaults.base_url);
        let timeout = match lookup("FORUM_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("FORUM_TIMEOUT_SECS", &raw)?),
            None => defaults.timeout,
        };
        let connect_timeout = match lookup("FORUM_CONNECT_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("FORUM_CONNECT_TIMEOUT_SECS", &raw)?),
            None => defaults.connect_timeout,
        };
        let page_size = match lookup("FORUM_PAGE_SIZE") {
            Some(raw) => parse_number("FORUM_PAGE_SIZE", &raw)?,
            None => defaults.page_size,
        };

        Self {
            base_url,
            timeout,
            connect_timeout,
            page_size,
        }
        .validated()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn validated(self) -> Result<Self, ForumClientError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ForumClientError::InvalidUrl(self.base_url));
        }
        if self.page_size == 0 {
            return Err(ForumClientError::Config(
                "page size must be positive".to_string(),
            ));
        }
        Ok(self)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ForumClientError> {
    raw.trim()
        .parse()
        .map_err(|_| ForumClientError::Config(format!("{} is not a number: {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("FORUM_API_URL", "https://forum.example.com"),
            ("FORUM_TIMEOUT_SECS", "30"),
            ("FORUM_PAGE_SIZE", "25"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://forum.example.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("FORUM_PAGE_SIZE", "ten")])),
            Err(ForumClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("FORUM_PAGE_SIZE", "0")])),
            Err(ForumClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("FORUM_API_URL", "localhost:8080")])),
            Err(ForumClientError::InvalidUrl(_))
        ));
    }
}
