use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EfdError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: StatusCode },
    #[error("csrfmiddlewaretoken field not found on the disclaimer page")]
    TokenNotFound,
    #[error("search response content type is not json: {0}")]
    UnexpectedContentType(String),
    #[error("search endpoint returned status {0:?}")]
    SearchRejected(String),
    #[error("page size must be greater than zero")]
    InvalidPageSize,
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EfdError>;
