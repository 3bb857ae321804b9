//! Error type shared by the fetch, store and render stages.
//!
//! Every stage is fatal on failure: errors bubble up to `main`, get logged,
//! and end the process with a non-zero exit status. Nothing is retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid API prefix: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("story {0} does not exist")]
    MissingStory(u64),

    #[error("seen-ID store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("cannot read template {path}: {source}")]
    TemplateNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("story {id} is missing field `{field}`")]
    MissingField { id: u64, field: &'static str },

    #[error("story {id} has an unrepresentable timestamp {time}")]
    InvalidTimestamp { id: u64, time: i64 },
}

pub type DigestResult<T> = Result<T, DigestError>;
