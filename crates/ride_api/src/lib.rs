use std::error;
use std::fmt;
use std::sync::Arc;

use tokio_util::codec::LinesCodecError;

pub mod client;
pub mod event_stream;
pub mod push;

pub use client::{RideApiClient, RideServer};
pub use push::PushChannel;

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    StreamError(Arc<LinesCodecError>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    Other(String),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::StreamError(e) => write!(f, "event stream error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            ApiError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

impl From<LinesCodecError> for ApiError {
    fn from(e: LinesCodecError) -> Self {
        ApiError::StreamError(Arc::new(e))
    }
}
