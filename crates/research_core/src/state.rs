use std::fmt;
use std::time::Duration;

use crate::view_model::{AppViewModel, HistoryRowView, HistoryView, ScreenView, StatusClass};
use crate::ProgressIndicator;

/// Identifies one started job. Results tagged with an older generation are stale.
pub type Generation = u64;

pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

pub const VALIDATION_MESSAGE: &str = "Please provide a topic and at least one research question.";
pub const POLL_FAILURE_MESSAGE: &str = "Error checking research status";
pub const DOWNLOAD_FAILURE_MESSAGE: &str = "Error downloading report.";
pub const JOB_FAILED_MESSAGE: &str = "Research failed";
pub const INITIALIZING_TEXT: &str = "Initializing research agent...";
pub const IN_PROGRESS_TEXT: &str = "Research in progress...";

/// Server-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    InProgress,
    Completed,
    Failed,
    /// Any other non-terminal status string, e.g. `processing`.
    Other(String),
}

impl JobState {
    pub fn from_wire(status: &str) -> Self {
        match status {
            "pending" => JobState::Pending,
            "in_progress" => JobState::InProgress,
            "completed" => JobState::Completed,
            "error" => JobState::Failed,
            other => JobState::Other(other.to_string()),
        }
    }
}

/// One status poll answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub state: JobState,
    pub report: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryEntry {
    pub topic: String,
    pub status: String,
    pub started_at: String,
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Topic,
    Questions,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Topic => FormField::Questions,
            FormField::Questions => FormField::Topic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInput {
    pub topic: String,
    pub questions: String,
    pub focus: FormField,
}

/// The one visible view. Switching views is assigning a new value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Form,
    Progress {
        topic: String,
        questions: Vec<String>,
        status_text: String,
    },
    Results {
        report: String,
        saved_to: Option<String>,
    },
    Error {
        message: String,
    },
}

/// Where the current job's request chain stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Chain {
    #[default]
    Idle,
    Creating,
    Polling,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    view: ViewState,
    form: FormInput,
    generation: Generation,
    chain: Chain,
    current_job: Option<JobId>,
    progress: ProgressIndicator,
    history: Vec<HistoryEntry>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let screen = match &self.view {
            ViewState::Form => ScreenView::Form {
                topic: self.form.topic.clone(),
                questions: self.form.questions.clone(),
                focus: self.form.focus,
            },
            ViewState::Progress {
                topic,
                questions,
                status_text,
            } => ScreenView::Progress {
                topic: topic.clone(),
                questions: questions.clone(),
                status_text: status_text.clone(),
            },
            ViewState::Results { report, saved_to } => ScreenView::Results {
                report: report.clone(),
                saved_to: saved_to.clone(),
            },
            ViewState::Error { message } => ScreenView::Error {
                message: message.clone(),
            },
        };

        let history = if self.history.is_empty() {
            HistoryView::Empty
        } else {
            HistoryView::Entries(
                self.history
                    .iter()
                    .map(|entry| HistoryRowView {
                        topic: entry.topic.clone(),
                        status: entry.status.clone(),
                        started_at: entry.started_at.clone(),
                        completed_at: entry.completed_at.clone(),
                        class: StatusClass::from_status(&entry.status),
                    })
                    .collect(),
            )
        };

        AppViewModel {
            screen,
            progress_percent: self.progress.percent(),
            history,
            can_download: self.current_job.is_some(),
            dirty: self.dirty,
        }
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn current_job(&self) -> Option<&JobId> {
        self.current_job.as_ref()
    }

    pub fn progress(&self) -> ProgressIndicator {
        self.progress
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_chain(&mut self, chain: Chain) {
        self.chain = chain;
    }

    /// Whether a result tagged `generation` belongs to the live chain in `expected` phase.
    pub(crate) fn accepts(&self, generation: Generation, expected: Chain) -> bool {
        generation == self.generation && self.chain == expected
    }

    /// Retires the current generation. Returns true if a chain was still live.
    pub(crate) fn supersede(&mut self) -> bool {
        let was_live = self.chain != Chain::Idle;
        self.generation += 1;
        if was_live {
            self.current_job = None;
        }
        self.chain = Chain::Idle;
        was_live
    }

    pub(crate) fn set_current_job(&mut self, job_id: Option<JobId>) {
        self.current_job = job_id;
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormInput {
        &mut self.form
    }

    pub(crate) fn progress_mut(&mut self) -> &mut ProgressIndicator {
        &mut self.progress
    }

    pub(crate) fn set_history(&mut self, entries: Vec<HistoryEntry>) {
        self.history = entries;
        self.mark_dirty();
    }

    pub(crate) fn show_form(&mut self) {
        self.view = ViewState::Form;
        self.mark_dirty();
    }

    pub(crate) fn show_progress(&mut self, topic: String, questions: Vec<String>) {
        self.progress.reset();
        self.view = ViewState::Progress {
            topic,
            questions,
            status_text: INITIALIZING_TEXT.to_string(),
        };
        self.mark_dirty();
    }

    pub(crate) fn set_status_text(&mut self, text: &str) {
        if let ViewState::Progress { status_text, .. } = &mut self.view {
            *status_text = text.to_string();
            self.mark_dirty();
        }
    }

    pub(crate) fn show_results(&mut self, report: String) {
        self.progress.complete();
        self.view = ViewState::Results {
            report,
            saved_to: None,
        };
        self.mark_dirty();
    }

    pub(crate) fn note_saved(&mut self, path: String) {
        if let ViewState::Results { saved_to, .. } = &mut self.view {
            *saved_to = Some(path);
            self.mark_dirty();
        }
    }

    pub(crate) fn show_error(&mut self, message: impl Into<String>) {
        self.view = ViewState::Error {
            message: message.into(),
        };
        self.mark_dirty();
    }
}
