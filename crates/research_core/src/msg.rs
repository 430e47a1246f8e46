#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The app finished setting up; load the initial history.
    Started,
    /// User edited one of the form fields.
    FieldEdited {
        field: crate::FormField,
        text: String,
    },
    /// User moved focus to the other form field.
    FocusNext,
    /// User submitted the research form.
    SubmitClicked,
    /// Backend answered the create-job request.
    JobCreated {
        generation: crate::Generation,
        result: Result<crate::JobId, String>,
    },
    /// Backend answered a status poll. The error carries diagnostic detail only.
    StatusReceived {
        generation: crate::Generation,
        result: Result<crate::StatusReport, String>,
    },
    /// User asked to save the report.
    DownloadClicked,
    /// Report saved (display path) or failed.
    ReportDownloaded {
        generation: crate::Generation,
        result: Result<String, String>,
    },
    /// User asked for a fresh form.
    NewResearchClicked,
    /// User closed the error view.
    DismissError,
    /// User asked to reload the history panel.
    RefreshHistoryClicked,
    /// History list fetched successfully.
    HistoryLoaded(Vec<crate::HistoryEntry>),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
