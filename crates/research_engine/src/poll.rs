use std::future::Future;
use std::time::Duration;

use research_logging::research_debug;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::Generation;

/// A scheduled status poll. Dropping the handle cancels the poll.
#[derive(Debug)]
pub struct PollHandle {
    generation: Generation,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Owns the single live poll. Scheduling a new poll releases the previous one.
#[derive(Debug, Default)]
pub struct PollScheduler {
    active: Option<PollHandle>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `poll` after `delay` unless cancelled first. A cancelled poll is
    /// dropped wherever it is suspended, so it never reports a result.
    pub fn schedule<F>(
        &mut self,
        runtime: &Handle,
        generation: Generation,
        delay: Duration,
        poll: F,
    ) where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let task = runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    research_debug!("Poll for generation {} cancelled", generation);
                }
                _ = async {
                    tokio::time::sleep(delay).await;
                    poll.await;
                } => {}
            }
        });

        let previous = self.active.replace(PollHandle {
            generation,
            token,
            task,
        });
        if let Some(previous) = previous {
            if !previous.is_finished() {
                research_debug!(
                    "Poll for generation {} superseded by generation {}",
                    previous.generation(),
                    generation
                );
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }

    /// Generation of a poll that is still waiting or running.
    pub fn active_generation(&self) -> Option<Generation> {
        self.active
            .as_ref()
            .filter(|handle| !handle.is_finished())
            .map(PollHandle::generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn cancelled_poll_never_runs() {
        let mut polls = PollScheduler::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        polls.schedule(&Handle::current(), 5, Duration::from_millis(50), async move {
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(polls.active_generation(), Some(5));

        polls.cancel();
        assert_eq!(polls.active_generation(), None);
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn finished_poll_is_no_longer_active() {
        let mut polls = PollScheduler::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        polls.schedule(&Handle::current(), 1, Duration::ZERO, async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(polls.active_generation(), None);
    }
}
