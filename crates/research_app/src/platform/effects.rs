use research_core::{Effect, HistoryEntry, JobId, JobState, Msg, StatusReport};
use research_engine::{EngineEvent, EngineHandle, FailureKind, HistoryItem};
use research_logging::{research_info, research_warn};

/// Shown when the backend refuses to create a job.
const CREATE_REJECTED_MESSAGE: &str = "Failed to start research";

/// Turns core effects into engine commands and engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CreateJob {
                    generation,
                    topic,
                    questions,
                } => {
                    self.engine.create_job(generation, topic, questions);
                }
                Effect::PollStatus {
                    generation,
                    job_id,
                    delay,
                } => {
                    self.engine
                        .poll_status(generation, job_id.as_str().to_string(), delay);
                }
                Effect::CancelPolling => self.engine.cancel_polling(),
                Effect::DownloadReport { generation, job_id } => {
                    research_info!("DownloadReport generation={} job_id={}", generation, job_id);
                    self.engine
                        .download_report(generation, job_id.as_str().to_string());
                }
                Effect::LoadHistory => self.engine.load_history(),
            }
        }
    }

    /// Messages for every engine event that arrived since the last call.
    pub fn drain(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            if let Some(msg) = event_to_msg(event) {
                msgs.push(msg);
            }
        }
        msgs
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::JobCreated { generation, result } => {
            let result = match result {
                Ok(created) => Ok(JobId::new(created.research_id)),
                Err(err) => {
                    research_warn!("Create job failed: {}", err);
                    Err(match err.kind {
                        FailureKind::HttpStatus(_) => CREATE_REJECTED_MESSAGE.to_string(),
                        _ => err.to_string(),
                    })
                }
            };
            Some(Msg::JobCreated { generation, result })
        }
        EngineEvent::StatusPolled { generation, result } => {
            let result = match result {
                Ok(status) => Ok(StatusReport {
                    state: JobState::from_wire(&status.status),
                    report: status.report,
                    error: status.error,
                }),
                Err(err) => {
                    research_warn!("Status poll failed: {}", err);
                    Err(err.to_string())
                }
            };
            Some(Msg::StatusReceived { generation, result })
        }
        EngineEvent::ReportSaved { generation, result } => {
            let result = match result {
                Ok(path) => Ok(path.display().to_string()),
                Err(err) => {
                    research_warn!("Report download failed: {}", err);
                    Err(err.to_string())
                }
            };
            Some(Msg::ReportDownloaded { generation, result })
        }
        EngineEvent::HistoryLoaded { result } => match result {
            Ok(response) => Some(Msg::HistoryLoaded(
                response.history.into_iter().map(history_entry).collect(),
            )),
            Err(err) => {
                research_warn!("Error loading history: {}", err);
                None
            }
        },
    }
}

fn history_entry(item: HistoryItem) -> HistoryEntry {
    HistoryEntry {
        topic: item.topic,
        status: item.status,
        started_at: item.started_at,
        completed_at: item.completed_at.filter(|at| !at.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use research_engine::{ApiError, CreateJobResponse, HistoryResponse, StatusResponse};

    fn api_error(kind: FailureKind) -> ApiError {
        ApiError {
            kind,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn rejected_create_uses_fixed_message() {
        let msg = event_to_msg(EngineEvent::JobCreated {
            generation: 4,
            result: Err(api_error(FailureKind::HttpStatus(500))),
        });
        assert_eq!(
            msg,
            Some(Msg::JobCreated {
                generation: 4,
                result: Err(CREATE_REJECTED_MESSAGE.to_string()),
            })
        );
    }

    #[test]
    fn network_create_failure_keeps_detail() {
        let msg = event_to_msg(EngineEvent::JobCreated {
            generation: 1,
            result: Err(api_error(FailureKind::Network)),
        });
        match msg {
            Some(Msg::JobCreated {
                result: Err(text), ..
            }) => assert!(text.starts_with("network error")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn created_job_carries_id() {
        let msg = event_to_msg(EngineEvent::JobCreated {
            generation: 2,
            result: Ok(CreateJobResponse {
                research_id: "research_1".to_string(),
            }),
        });
        assert_eq!(
            msg,
            Some(Msg::JobCreated {
                generation: 2,
                result: Ok(JobId::new("research_1")),
            })
        );
    }

    #[test]
    fn status_is_parsed_into_job_state() {
        let msg = event_to_msg(EngineEvent::StatusPolled {
            generation: 3,
            result: Ok(StatusResponse {
                status: "completed".to_string(),
                report: Some("done".to_string()),
                error: None,
            }),
        });
        assert_eq!(
            msg,
            Some(Msg::StatusReceived {
                generation: 3,
                result: Ok(StatusReport {
                    state: JobState::Completed,
                    report: Some("done".to_string()),
                    error: None,
                }),
            })
        );
    }

    #[test]
    fn history_failure_is_silent() {
        let msg = event_to_msg(EngineEvent::HistoryLoaded {
            result: Err(api_error(FailureKind::Timeout)),
        });
        assert_eq!(msg, None);
    }

    #[test]
    fn history_items_keep_order_and_drop_empty_completion() {
        let msg = event_to_msg(EngineEvent::HistoryLoaded {
            result: Ok(HistoryResponse {
                history: vec![
                    HistoryItem {
                        id: Some("b".to_string()),
                        topic: "Second".to_string(),
                        status: "error".to_string(),
                        started_at: "2024-05-02T09:00:00".to_string(),
                        completed_at: Some(String::new()),
                    },
                    HistoryItem {
                        id: None,
                        topic: "First".to_string(),
                        status: "completed".to_string(),
                        started_at: "2024-05-01T09:00:00".to_string(),
                        completed_at: Some("2024-05-01T09:05:00".to_string()),
                    },
                ],
            }),
        });
        let Some(Msg::HistoryLoaded(entries)) = msg else {
            panic!("expected history");
        };
        assert_eq!(entries[0].topic, "Second");
        assert_eq!(entries[0].completed_at, None);
        assert_eq!(entries[1].topic, "First");
        assert_eq!(
            entries[1].completed_at.as_deref(),
            Some("2024-05-01T09:05:00")
        );
    }

    #[test]
    fn saved_report_path_is_displayed() {
        let path = std::path::PathBuf::from("/tmp/research_report_AI.txt");
        let msg = event_to_msg(EngineEvent::ReportSaved {
            generation: 6,
            result: Ok(path.clone()),
        });
        assert_eq!(
            msg,
            Some(Msg::ReportDownloaded {
                generation: 6,
                result: Ok(path.display().to_string()),
            })
        );
    }
}
