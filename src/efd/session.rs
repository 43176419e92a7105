use log::{debug, info};
use once_cell::sync::Lazy;
use rand::{distributions::Alphanumeric, Rng};
use reqwest::{cookie::Jar, header, Client, StatusCode};
use scraper::{Html, Selector};
use std::sync::Arc;
use url::{form_urlencoded, Url};

use super::error::{EfdError, Result};
use crate::core::config::EfdConfig;

static CSRF_FIELD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[name=csrfmiddlewaretoken]").unwrap());

pub const CSRF_TOKEN_LENGTH: usize = 64;

const HOME_PATH: &str = "/search/home/";
const SEARCH_PATH: &str = "/search/";
const SEARCH_DATA_PATH: &str = "/search/report/data/";

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub base: Url,
    pub home: Url,
    pub search: Url,
    pub search_data: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        Ok(Endpoints {
            home: base.join(HOME_PATH)?,
            search: base.join(SEARCH_PATH)?,
            search_data: base.join(SEARCH_DATA_PATH)?,
            base,
        })
    }
}

/// Authenticated connection to the disclosure portal.
///
/// Owns the cookie store and the "disclaimer accepted" flag. Not meant to be
/// shared between concurrent callers; give each one its own session.
pub struct Session {
    jar: Arc<Jar>,
    client: Client,
    config: EfdConfig,
    endpoints: Endpoints,
    authed: bool,
}

impl Session {
    pub fn new(config: EfdConfig) -> Result<Self> {
        let endpoints = Endpoints::new(&config.base_url)?;
        let jar = Arc::new(Jar::default());
        let client = build_client(&config, &jar)?;

        Ok(Session {
            jar,
            client,
            config,
            endpoints,
            authed: false,
        })
    }

    pub fn config(&self) -> &EfdConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn is_authenticated(&self) -> bool {
        self.authed
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Cookies the session would send to `url`, as a `Cookie` header value.
    pub fn cookies_for(&self, url: &Url) -> Option<String> {
        use reqwest::cookie::CookieStore;
        self.jar
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Stores the search token as the `csrftoken` cookie next to the session
    /// cookies, replacing the previous page's token.
    pub(crate) fn set_csrf_cookie(&self, token: &str) {
        self.jar
            .add_cookie_str(&format!("csrftoken={}; Path=/", token), &self.endpoints.base);
    }

    /// Drops all cookies and the accepted disclaimer.
    pub fn reset_session(&mut self) -> Result<()> {
        self.jar = Arc::new(Jar::default());
        self.client = build_client(&self.config, &self.jar)?;
        self.authed = false;
        Ok(())
    }

    /// Accepts the portal's usage disclaimer so document pages can be read.
    pub async fn accept_disclaimer(&mut self) -> Result<()> {
        let token = self.fetch_disclaimer_token().await?;

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("prohibition_agreement", "1")
            .append_pair("csrfmiddlewaretoken", &token)
            .finish();

        let response = self
            .client
            .post(self.endpoints.home.as_str())
            .header(header::REFERER, self.endpoints.home.as_str())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::CONTENT_LENGTH, body.len())
            .header(header::USER_AGENT, &self.config.user_agent)
            .body(body)
            .send()
            .await?;

        debug!("Disclaimer response status: {}", response.status());

        self.authed = true;
        info!("Accepted disclaimer at {}", self.endpoints.home);
        Ok(())
    }

    /// Runs the disclaimer handshake unless it already succeeded.
    pub async fn ensure_authenticated(&mut self) -> Result<()> {
        if !self.authed {
            self.accept_disclaimer().await?;
        }
        Ok(())
    }

    async fn fetch_disclaimer_token(&self) -> Result<String> {
        debug!("Fetching disclaimer page {}", self.endpoints.home);

        let response = self
            .client
            .get(self.endpoints.home.as_str())
            .header(header::USER_AGENT, &self.config.user_agent)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(EfdError::UnexpectedStatus {
                url: self.endpoints.home.to_string(),
                status: response.status(),
            });
        }

        let html = response.text().await?;
        parse_csrf_token(&html).ok_or(EfdError::TokenNotFound)
    }
}

fn build_client(config: &EfdConfig, jar: &Arc<Jar>) -> Result<Client> {
    let mut builder = Client::builder()
        .cookie_provider(Arc::clone(jar))
        .user_agent(config.user_agent.as_str())
        .gzip(true);

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

/// Server-issued token from the first `csrfmiddlewaretoken` form field.
pub fn parse_csrf_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&CSRF_FIELD_SELECTOR)
        .next()
        .and_then(|field| field.value().attr("value"))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Client-side token sent with search requests. The portal only checks its
/// shape: 64 characters of `[a-zA-Z0-9]`.
pub fn generate_csrf_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CSRF_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = generate_csrf_token();
        assert_eq!(token.len(), CSRF_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_csrf_token());
    }

    #[test]
    fn test_parse_csrf_token() {
        let html = r#"<html><body><form method="post">
            <input type="hidden" name="csrfmiddlewaretoken" value="first-token">
            <input type="checkbox" name="prohibition_agreement" value="1">
            </form>
            <form><input type="hidden" name="csrfmiddlewaretoken" value="second-token"></form>
            </body></html>"#;
        assert_eq!(parse_csrf_token(html).as_deref(), Some("first-token"));
    }

    #[test]
    fn test_parse_csrf_token_missing() {
        assert_eq!(parse_csrf_token("<html><body><form></form></body></html>"), None);
        assert_eq!(
            parse_csrf_token(r#"<input name="csrfmiddlewaretoken" value="">"#),
            None
        );
    }

    #[test]
    fn test_endpoints() {
        let endpoints = Endpoints::new("https://efdsearch.senate.gov").unwrap();
        assert_eq!(endpoints.home.as_str(), "https://efdsearch.senate.gov/search/home/");
        assert_eq!(endpoints.search.as_str(), "https://efdsearch.senate.gov/search/");
        assert_eq!(
            endpoints.search_data.as_str(),
            "https://efdsearch.senate.gov/search/report/data/"
        );
    }

    #[test]
    fn test_reset_session_clears_auth() {
        let mut session = Session::new(EfdConfig::default()).unwrap();
        session.authed = true;
        session.reset_session().unwrap();
        assert!(!session.is_authenticated());
    }
}
