use std::time::Duration;

use crate::{Generation, JobId};

/// Work requested by `update` and carried out by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit a new research job.
    CreateJob {
        generation: Generation,
        topic: String,
        questions: Vec<String>,
    },
    /// Check the job status once `delay` has elapsed.
    PollStatus {
        generation: Generation,
        job_id: JobId,
        delay: Duration,
    },
    /// Drop any scheduled or in-flight status poll.
    CancelPolling,
    /// Fetch the finished report and save it to disk.
    DownloadReport {
        generation: Generation,
        job_id: JobId,
    },
    /// Fetch the history list.
    LoadHistory,
}
