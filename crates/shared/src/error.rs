use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ProductId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Network,
    NotFound,
    EmptyResult,
    Decode,
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {message}")]
    Network {
        message: String,
        status: Option<u16>,
    },
    #[error("product {0} not found")]
    NotFound(ProductId),
    #[error("invalid catalog response: {0}")]
    Decode(String),
}

impl CatalogError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network { .. } => ErrorCode::Network,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Decode(_) => ErrorCode::Decode,
        }
    }

    /// Transport failures and server-side (5xx) statuses are worth another
    /// attempt; client-side statuses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { status: None, .. } => true,
            Self::Network {
                status: Some(status),
                ..
            } => *status >= 500,
            Self::NotFound(_) | Self::Decode(_) => false,
        }
    }
}
