use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid response from identity provider: {0}")]
    InvalidResponse(String),
}
