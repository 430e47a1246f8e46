//! Research client core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod progress;
mod state;
mod submission;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use progress::{ProgressIndicator, PROGRESS_CAP, PROGRESS_STEP};
pub use state::{
    AppState, FormField, FormInput, Generation, HistoryEntry, JobId, JobState, StatusReport,
    ViewState, DOWNLOAD_FAILURE_MESSAGE, INITIALIZING_TEXT, IN_PROGRESS_TEXT, JOB_FAILED_MESSAGE,
    POLL_FAILURE_MESSAGE, POLL_INTERVAL, VALIDATION_MESSAGE,
};
pub use submission::{parse_questions, Submission, ValidationError};
pub use update::update;
pub use view_model::{
    AppViewModel, HistoryRowView, HistoryView, ScreenView, StatusClass, EMPTY_HISTORY_TEXT,
};
