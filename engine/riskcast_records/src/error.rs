use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API returned an error: {0}")]
    Api(String),

    #[error("response carried no records")]
    Empty,

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API URL '{0}' cannot carry a path")]
    BaseUrl(String),

    #[error("request to {0} needs a signed-in session")]
    SignedOut(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
