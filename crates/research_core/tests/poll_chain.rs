use std::time::Duration;

use pretty_assertions::assert_eq;
use research_core::{
    update, AppState, Effect, FormField, Generation, JobId, JobState, Msg, ScreenView,
    StatusReport, IN_PROGRESS_TEXT, POLL_FAILURE_MESSAGE, POLL_INTERVAL, PROGRESS_CAP,
};

fn init_logging() {
    research_logging::initialize_for_tests();
}

fn started_job(topic: &str, job_id: &str) -> (AppState, Generation, Vec<Effect>) {
    let (state, _) = update(
        AppState::new(),
        Msg::FieldEdited {
            field: FormField::Topic,
            text: topic.to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::FieldEdited {
            field: FormField::Questions,
            text: "Why?".to_string(),
        },
    );
    let (state, _) = update(state, Msg::SubmitClicked);
    let generation = state.generation();
    let (state, effects) = update(
        state,
        Msg::JobCreated {
            generation,
            result: Ok(JobId::new(job_id)),
        },
    );
    (state, generation, effects)
}

fn status(state: JobState) -> StatusReport {
    StatusReport {
        state,
        report: None,
        error: None,
    }
}

fn poll_delays(effects: &[Effect]) -> Vec<Duration> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::PollStatus { delay, .. } => Some(*delay),
            _ => None,
        })
        .collect()
}

#[test]
fn three_polls_until_completed() {
    init_logging();
    let (state, generation, effects) = started_job("Fusion", "research_1");
    let mut polls = poll_delays(&effects);

    let responses = vec![
        status(JobState::InProgress),
        status(JobState::InProgress),
        StatusReport {
            state: JobState::Completed,
            report: Some("# Fusion\nIt works.".to_string()),
            error: None,
        },
    ];

    let mut state = state;
    let mut rounds = Vec::new();
    for response in responses {
        let (next, effects) = update(
            state,
            Msg::StatusReceived {
                generation,
                result: Ok(response),
            },
        );
        polls.extend(poll_delays(&effects));
        rounds.push(effects);
        state = next;
    }

    // One immediate poll after creation, then one per in-progress answer.
    assert_eq!(polls, vec![Duration::ZERO, POLL_INTERVAL, POLL_INTERVAL]);
    assert_eq!(POLL_INTERVAL, Duration::from_millis(2000));
    assert_eq!(rounds.last(), Some(&vec![Effect::LoadHistory]));

    let view = state.view();
    assert_eq!(
        view.screen,
        ScreenView::Results {
            report: "# Fusion\nIt works.".to_string(),
            saved_to: None,
        }
    );
    assert_eq!(view.progress_percent, 100);
}

#[test]
fn server_error_is_shown_verbatim_and_stops_polling() {
    init_logging();
    let (state, generation, _) = started_job("Fusion", "research_1");
    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            generation,
            result: Ok(StatusReport {
                state: JobState::Failed,
                report: None,
                error: Some("quota exceeded".to_string()),
            }),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.view().screen,
        ScreenView::Error {
            message: "quota exceeded".to_string()
        }
    );

    // A late duplicate answer for the finished chain is ignored.
    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            generation,
            result: Ok(status(JobState::InProgress)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().screen,
        ScreenView::Error {
            message: "quota exceeded".to_string()
        }
    );
}

#[test]
fn poll_failure_shows_generic_message_without_retry() {
    init_logging();
    let (state, generation, _) = started_job("Fusion", "research_1");
    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            generation,
            result: Err("connection reset".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.view().screen,
        ScreenView::Error {
            message: POLL_FAILURE_MESSAGE.to_string()
        }
    );
}

#[test]
fn progress_is_monotonic_and_capped_until_completion() {
    init_logging();
    let (mut state, generation, _) = started_job("Fusion", "research_1");
    let mut previous = state.view().progress_percent;
    assert_eq!(previous, 0);

    for _ in 0..15 {
        let (next, _) = update(
            state,
            Msg::StatusReceived {
                generation,
                result: Ok(status(JobState::Other("processing".to_string()))),
            },
        );
        let percent = next.view().progress_percent;
        assert!(percent >= previous);
        assert!(percent <= PROGRESS_CAP);
        previous = percent;
        state = next;
    }
    assert_eq!(previous, PROGRESS_CAP);
    match state.view().screen {
        ScreenView::Progress { status_text, .. } => assert_eq!(status_text, IN_PROGRESS_TEXT),
        other => panic!("unexpected screen {other:?}"),
    }

    let (state, _) = update(
        state,
        Msg::StatusReceived {
            generation,
            result: Ok(status(JobState::Completed)),
        },
    );
    assert_eq!(state.view().progress_percent, 100);
}

#[test]
fn new_job_supersedes_stale_poll_results() {
    init_logging();
    let (state, first_generation, _) = started_job("First", "job_a");

    let (state, _) = update(
        state,
        Msg::FieldEdited {
            field: research_core::FormField::Topic,
            text: "Second".to_string(),
        },
    );
    let (state, effects) = update(state, Msg::SubmitClicked);
    let second_generation = state.generation();
    assert_ne!(first_generation, second_generation);
    assert_eq!(effects[0], Effect::CancelPolling);
    assert!(matches!(effects[1], Effect::CreateJob { .. }));

    // The old chain's answer arrives late and must not touch the new job.
    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            generation: first_generation,
            result: Ok(status(JobState::Completed)),
        },
    );
    assert!(effects.is_empty());
    assert!(matches!(state.view().screen, ScreenView::Progress { .. }));

    let (state, effects) = update(
        state,
        Msg::JobCreated {
            generation: second_generation,
            result: Ok(JobId::new("job_b")),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::PollStatus {
            generation: second_generation,
            job_id: JobId::new("job_b"),
            delay: Duration::ZERO,
        }]
    );
    assert_eq!(state.current_job(), Some(&JobId::new("job_b")));
}

#[test]
fn stale_create_response_is_ignored_after_reset() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::FieldEdited {
            field: FormField::Topic,
            text: "Topic".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::FieldEdited {
            field: FormField::Questions,
            text: "Q".to_string(),
        },
    );
    let (state, _) = update(state, Msg::SubmitClicked);
    let generation = state.generation();
    let (state, effects) = update(state, Msg::NewResearchClicked);
    assert_eq!(effects, vec![Effect::CancelPolling]);

    let (state, effects) = update(
        state,
        Msg::JobCreated {
            generation,
            result: Ok(JobId::new("late")),
        },
    );
    assert!(effects.is_empty());
    assert!(state.current_job().is_none());
    assert!(matches!(state.view().screen, ScreenView::Form { .. }));
}

#[test]
fn late_download_result_does_not_touch_next_job() {
    init_logging();
    let (state, first_generation, _) = started_job("Topic A", "job_a");
    let (state, _) = update(
        state,
        Msg::StatusReceived {
            generation: first_generation,
            result: Ok(StatusReport {
                state: JobState::Completed,
                report: Some("A report".to_string()),
                error: None,
            }),
        },
    );
    let (state, effects) = update(state, Msg::DownloadClicked);
    assert_eq!(
        effects,
        vec![Effect::DownloadReport {
            generation: first_generation,
            job_id: JobId::new("job_a"),
        }]
    );

    // Start job B while A's download is still in flight.
    let (state, _) = update(state, Msg::NewResearchClicked);
    let (state, _) = update(
        state,
        Msg::FieldEdited {
            field: FormField::Topic,
            text: "Topic B".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::FieldEdited {
            field: FormField::Questions,
            text: "Why?".to_string(),
        },
    );
    let (state, _) = update(state, Msg::SubmitClicked);
    let second_generation = state.generation();
    assert_ne!(first_generation, second_generation);
    let (state, _) = update(
        state,
        Msg::JobCreated {
            generation: second_generation,
            result: Ok(JobId::new("job_b")),
        },
    );

    let (state, effects) = update(
        state,
        Msg::ReportDownloaded {
            generation: first_generation,
            result: Err("connection reset".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert!(matches!(state.view().screen, ScreenView::Progress { .. }));

    let (state, _) = update(
        state,
        Msg::StatusReceived {
            generation: second_generation,
            result: Ok(StatusReport {
                state: JobState::Completed,
                report: Some("B report".to_string()),
                error: None,
            }),
        },
    );
    let (state, effects) = update(
        state,
        Msg::ReportDownloaded {
            generation: first_generation,
            result: Ok("/dl/research_report_Topic_A.txt".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().screen,
        ScreenView::Results {
            report: "B report".to_string(),
            saved_to: None,
        }
    );
}
