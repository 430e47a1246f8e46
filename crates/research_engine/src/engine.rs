use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use research_logging::{research_debug, research_info, research_warn};
use tokio::runtime::Runtime;

use crate::api::{ApiSettings, ReqwestResearchApi, ResearchApi};
use crate::persist::save_report;
use crate::poll::PollScheduler;
use crate::{CreateJobRequest, DownloadError, EngineError, EngineEvent, Generation};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api: ApiSettings,
    pub download_dir: PathBuf,
}

enum EngineCommand {
    CreateJob {
        generation: Generation,
        request: CreateJobRequest,
    },
    PollStatus {
        generation: Generation,
        research_id: String,
        delay: Duration,
    },
    CancelPolling,
    DownloadReport {
        generation: Generation,
        research_id: String,
    },
    LoadHistory,
}

/// Front door to the engine thread. Commands go in, [`EngineEvent`]s come out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestResearchApi::new(config.api)?);
        Self::with_api(api, config.download_dir)
    }

    /// Starts the engine thread on top of any [`ResearchApi`] implementation.
    pub fn with_api(
        api: Arc<dyn ResearchApi>,
        download_dir: PathBuf,
    ) -> Result<Self, EngineError> {
        let runtime = Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let dispatcher = Dispatcher {
                runtime,
                api,
                download_dir,
                event_tx,
                polls: PollScheduler::new(),
            };
            dispatcher.run(cmd_rx);
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn create_job(&self, generation: Generation, topic: String, questions: Vec<String>) {
        self.send(EngineCommand::CreateJob {
            generation,
            request: CreateJobRequest { topic, questions },
        });
    }

    pub fn poll_status(&self, generation: Generation, research_id: String, delay: Duration) {
        self.send(EngineCommand::PollStatus {
            generation,
            research_id,
            delay,
        });
    }

    pub fn cancel_polling(&self) {
        self.send(EngineCommand::CancelPolling);
    }

    pub fn download_report(&self, generation: Generation, research_id: String) {
        self.send(EngineCommand::DownloadReport {
            generation,
            research_id,
        });
    }

    pub fn load_history(&self) {
        self.send(EngineCommand::LoadHistory);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            research_warn!("Engine thread is gone; command dropped");
        }
    }
}

struct Dispatcher {
    runtime: Runtime,
    api: Arc<dyn ResearchApi>,
    download_dir: PathBuf,
    event_tx: mpsc::Sender<EngineEvent>,
    polls: PollScheduler,
}

impl Dispatcher {
    fn run(mut self, cmd_rx: mpsc::Receiver<EngineCommand>) {
        while let Ok(command) = cmd_rx.recv() {
            self.dispatch(command);
        }
        self.polls.cancel();
        research_debug!("Engine command channel closed");
    }

    fn dispatch(&mut self, command: EngineCommand) {
        let api = self.api.clone();
        let event_tx = self.event_tx.clone();
        match command {
            EngineCommand::CreateJob {
                generation,
                request,
            } => {
                research_info!(
                    "CreateJob generation={} topic={:?} questions={}",
                    generation,
                    request.topic,
                    request.questions.len()
                );
                self.runtime.spawn(async move {
                    let result = api.create_job(&request).await;
                    let _ = event_tx.send(EngineEvent::JobCreated { generation, result });
                });
            }
            EngineCommand::PollStatus {
                generation,
                research_id,
                delay,
            } => {
                research_debug!(
                    "PollStatus generation={} id={} delay_ms={}",
                    generation,
                    research_id,
                    delay.as_millis()
                );
                self.polls
                    .schedule(self.runtime.handle(), generation, delay, async move {
                        let result = api.job_status(&research_id).await;
                        let _ = event_tx.send(EngineEvent::StatusPolled { generation, result });
                    });
            }
            EngineCommand::CancelPolling => {
                if let Some(generation) = self.polls.active_generation() {
                    research_debug!("Cancelling poll for generation {}", generation);
                }
                self.polls.cancel();
            }
            EngineCommand::DownloadReport {
                generation,
                research_id,
            } => {
                let download_dir = self.download_dir.clone();
                self.runtime.spawn(async move {
                    let result = match api.job_report(&research_id).await {
                        Ok(report) => {
                            save_report(&download_dir, &report).map_err(DownloadError::from)
                        }
                        Err(err) => Err(DownloadError::from(err)),
                    };
                    let _ = event_tx.send(EngineEvent::ReportSaved { generation, result });
                });
            }
            EngineCommand::LoadHistory => {
                self.runtime.spawn(async move {
                    let result = api.history().await;
                    let _ = event_tx.send(EngineEvent::HistoryLoaded { result });
                });
            }
        }
    }
}
