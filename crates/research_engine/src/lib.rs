//! Research engine: HTTP calls, poll scheduling and report persistence.
mod api;
mod engine;
mod filename;
mod persist;
mod poll;
mod types;

pub use api::{ApiSettings, ReqwestResearchApi, ResearchApi, DEFAULT_BASE_URL};
pub use engine::{EngineConfig, EngineHandle};
pub use filename::report_filename;
pub use persist::{ensure_output_dir, save_report, AtomicFileWriter, PersistError};
pub use poll::{PollHandle, PollScheduler};
pub use types::{
    ApiError, CreateJobRequest, CreateJobResponse, DownloadError, EngineError, EngineEvent,
    FailureKind, Generation, HistoryItem, HistoryResponse, ReportResponse, StatusResponse,
};
