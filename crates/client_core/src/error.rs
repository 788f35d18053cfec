use std::error::Error as _;

use shared::error::DecodeError;
use thiserror::Error;

/// A remote lookup that produced no usable payload. Provider rejections keep
/// the provider's own wording as their display text.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{message}")]
    Provider { message: String },
    #[error("request failed: {detail}")]
    Transport {
        detail: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider answered with HTTP {0}")]
    Status(u16),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("invalid provider url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    pub fn is_provider_rejection(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The request url carries the api key; keep it out of messages.
        let source = err.without_url();
        let mut detail = source.to_string();
        let mut cause = source.source();
        while let Some(inner) = cause {
            detail.push_str(": ");
            detail.push_str(&inner.to_string());
            cause = inner.source();
        }
        Self::Transport { detail, source }
    }
}
