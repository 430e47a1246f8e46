use crate::state::Chain;
use crate::{
    AppState, Effect, JobState, Msg, Submission, DOWNLOAD_FAILURE_MESSAGE, IN_PROGRESS_TEXT,
    JOB_FAILED_MESSAGE, POLL_FAILURE_MESSAGE, POLL_INTERVAL, VALIDATION_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started | Msg::RefreshHistoryClicked => vec![Effect::LoadHistory],
        Msg::FieldEdited { field, text } => {
            let form = state.form_mut();
            match field {
                crate::FormField::Topic => form.topic = text,
                crate::FormField::Questions => form.questions = text,
            }
            form.focus = field;
            state.mark_dirty();
            Vec::new()
        }
        Msg::FocusNext => {
            let form = state.form_mut();
            form.focus = form.focus.next();
            state.mark_dirty();
            Vec::new()
        }
        Msg::SubmitClicked => {
            let submission = match Submission::from_form(state.form()) {
                Ok(submission) => submission,
                Err(_) => {
                    state.show_error(VALIDATION_MESSAGE);
                    return (state, Vec::new());
                }
            };
            let mut effects = Vec::with_capacity(2);
            if state.supersede() {
                effects.push(Effect::CancelPolling);
            }
            state.set_current_job(None);
            state.set_chain(Chain::Creating);
            let Submission { topic, questions } = submission;
            state.show_progress(topic.clone(), questions.clone());
            effects.push(Effect::CreateJob {
                generation: state.generation(),
                topic,
                questions,
            });
            effects
        }
        Msg::JobCreated { generation, result } => {
            if !state.accepts(generation, Chain::Creating) {
                return (state, Vec::new());
            }
            match result {
                Ok(job_id) => {
                    state.set_current_job(Some(job_id.clone()));
                    state.set_chain(Chain::Polling);
                    vec![Effect::PollStatus {
                        generation,
                        job_id,
                        delay: std::time::Duration::ZERO,
                    }]
                }
                Err(message) => {
                    state.set_chain(Chain::Idle);
                    state.show_error(message);
                    Vec::new()
                }
            }
        }
        Msg::StatusReceived { generation, result } => {
            if !state.accepts(generation, Chain::Polling) {
                return (state, Vec::new());
            }
            let Some(job_id) = state.current_job().cloned() else {
                return (state, Vec::new());
            };
            match result {
                Ok(status) => match status.state {
                    JobState::Completed => {
                        state.set_chain(Chain::Idle);
                        state.show_results(status.report.unwrap_or_default());
                        vec![Effect::LoadHistory]
                    }
                    JobState::Failed => {
                        state.set_chain(Chain::Idle);
                        state.show_error(
                            status
                                .error
                                .unwrap_or_else(|| JOB_FAILED_MESSAGE.to_string()),
                        );
                        Vec::new()
                    }
                    JobState::Pending | JobState::InProgress | JobState::Other(_) => {
                        state.progress_mut().advance();
                        state.set_status_text(IN_PROGRESS_TEXT);
                        state.mark_dirty();
                        vec![Effect::PollStatus {
                            generation,
                            job_id,
                            delay: POLL_INTERVAL,
                        }]
                    }
                },
                Err(_) => {
                    state.set_chain(Chain::Idle);
                    state.show_error(POLL_FAILURE_MESSAGE);
                    Vec::new()
                }
            }
        }
        Msg::DownloadClicked => match state.current_job() {
            Some(job_id) => vec![Effect::DownloadReport {
                generation: state.generation(),
                job_id: job_id.clone(),
            }],
            None => Vec::new(),
        },
        Msg::ReportDownloaded { generation, result } => {
            if generation != state.generation() {
                return (state, Vec::new());
            }
            match result {
                Ok(path) => state.note_saved(path),
                Err(_) => state.show_error(DOWNLOAD_FAILURE_MESSAGE),
            }
            Vec::new()
        }
        Msg::NewResearchClicked => {
            let mut effects = Vec::new();
            if state.supersede() {
                effects.push(Effect::CancelPolling);
            }
            *state.form_mut() = crate::FormInput::default();
            state.progress_mut().reset();
            state.show_form();
            effects
        }
        Msg::DismissError => {
            if matches!(state.view_state(), crate::ViewState::Error { .. }) {
                state.show_form();
            }
            Vec::new()
        }
        Msg::HistoryLoaded(entries) => {
            state.set_history(entries);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
