use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::persist::PersistError;

/// Poll-chain tag echoed back in events so the caller can drop stale results.
pub type Generation = u64;

/// Body of `POST /api/research`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateJobRequest {
    pub topic: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateJobResponse {
    pub research_id: String,
}

/// Body of `GET /api/research/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /api/research/{id}/report`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportResponse {
    pub topic: String,
    pub report: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
}

#[derive(Debug)]
pub enum EngineEvent {
    JobCreated {
        generation: Generation,
        result: Result<CreateJobResponse, ApiError>,
    },
    StatusPolled {
        generation: Generation,
        result: Result<StatusResponse, ApiError>,
    },
    ReportSaved {
        generation: Generation,
        result: Result<PathBuf, DownloadError>,
    },
    HistoryLoaded {
        result: Result<HistoryResponse, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Encode,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Encode => write!(f, "request encoding error"),
            FailureKind::Decode => write!(f, "response decoding error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("report fetch failed: {0}")]
    Api(#[from] ApiError),
    #[error("report save failed: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(#[from] ApiError),
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
