use crate::FormField;

pub const EMPTY_HISTORY_TEXT: &str = "No research history yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub screen: ScreenView,
    pub progress_percent: u8,
    pub history: HistoryView,
    pub can_download: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView {
    Form {
        topic: String,
        questions: String,
        focus: FormField,
    },
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    /// Nothing to list; show [`EMPTY_HISTORY_TEXT`].
    Empty,
    Entries(Vec<HistoryRowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub topic: String,
    pub status: String,
    /// Raw timestamp as sent by the backend; the renderer localizes it.
    pub started_at: String,
    pub completed_at: Option<String>,
    pub class: StatusClass,
}

/// Visual treatment of a history row, derived from its status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Completed,
    Failed,
    Running,
}

impl StatusClass {
    pub fn from_status(status: &str) -> Self {
        match status {
            "completed" => StatusClass::Completed,
            "error" => StatusClass::Failed,
            _ => StatusClass::Running,
        }
    }
}
