use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:75.0) Gecko/20100101 Firefox/75.0";
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";
pub const DEFAULT_BASE_URL: &str = "https://efdsearch.senate.gov";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct EfdConfig {
    pub user_agent: String,
    /// chrono pattern for the portal's submitted and transaction dates.
    pub date_format: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub page_size: usize,
    pub data_dir: PathBuf,
}

impl Default for EfdConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            page_size: DEFAULT_PAGE_SIZE,
            data_dir: PathBuf::from(crate::utils::dirs::DATA_DIR),
        }
    }
}

impl EfdConfig {
    /// Empty strings select the defaults.
    pub fn new(user_agent: &str, date_format: &str) -> Self {
        let mut config = Self::default();
        if !user_agent.is_empty() {
            config.user_agent = user_agent.to_string();
        }
        if !date_format.is_empty() {
            config.date_format = date_format.to_string();
        }
        config
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let user_agent = std::env::var("EFD_USER_AGENT").unwrap_or_default();
        let date_format = std::env::var("EFD_DATE_FORMAT").unwrap_or_default();
        let mut config = Self::new(&user_agent, &date_format);

        if let Ok(base_url) = std::env::var("EFD_BASE_URL") {
            config = config.with_base_url(&base_url);
        }

        if let Ok(secs) = std::env::var("EFD_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| anyhow!("EFD_TIMEOUT_SECS must be a number of seconds, got {}", secs))?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Ok(page_size) = std::env::var("EFD_PAGE_SIZE") {
            config.page_size = match page_size.parse() {
                Ok(n) if n > 0 => n,
                _ => return Err(anyhow!("EFD_PAGE_SIZE must be a positive number, got {}", page_size)),
            };
        }

        if let Ok(data_dir) = std::env::var("EFD_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_use_defaults() {
        let config = EfdConfig::new("", "");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);

        let config = EfdConfig::new("efd-test", "%Y-%m-%d");
        assert_eq!(config.user_agent, "efd-test");
        assert_eq!(config.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = EfdConfig::default().with_base_url("http://127.0.0.1:8080/");
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
    }
}
