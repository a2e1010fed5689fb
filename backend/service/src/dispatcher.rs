//! Tree-owner dispatcher.
//!
//! One dedicated OS thread owns the state `S`. Callers submit closures over a
//! bounded channel and await the result on a oneshot. Jobs run one at a time
//! in submission order. When every [`Dispatcher`] handle is dropped the queue
//! closes and the thread exits.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use visprobe_core::ProbeError;

/// Default queue depth between callers and the owner thread.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

const OWNER_THREAD_NAME: &str = "tree-owner";

type Job<S> = Box<dyn FnOnce(&mut S) + Send>;

pub struct Dispatcher<S> {
    tx: mpsc::Sender<Job<S>>,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S> std::fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<S: 'static> Dispatcher<S> {
    /// Starts the owner thread. `init` builds the state on that thread, so
    /// `S` itself never crosses threads.
    pub fn spawn<F>(capacity: usize, init: F) -> Result<(Self, JoinHandle<()>), ProbeError>
    where
        F: FnOnce() -> S + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Job<S>>(capacity.max(1));

        let handle = thread::Builder::new()
            .name(OWNER_THREAD_NAME.into())
            .spawn(move || {
                let mut state = init();
                info!(capacity, "Tree owner started");
                while let Some(job) = rx.blocking_recv() {
                    // A panicking job drops its reply sender; the caller sees
                    // ChannelClosed and the owner keeps serving.
                    if panic::catch_unwind(AssertUnwindSafe(|| job(&mut state))).is_err() {
                        error!("Tree-owner job panicked");
                    }
                }
                info!("Tree owner stopped");
            })
            .map_err(|e| ProbeError::Other(anyhow::anyhow!("failed to spawn tree-owner thread: {e}")))?;

        Ok((Self { tx }, handle))
    }

    /// Runs `job` on the owner thread and returns its result.
    pub async fn run<R, F>(&self, job: F) -> Result<R, ProbeError>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job<S> = Box::new(move |state: &mut S| {
            let _ = reply_tx.send(job(state));
        });

        self.tx
            .send(job)
            .await
            .map_err(|_| ProbeError::ChannelClosed("dispatcher queue is closed".into()))?;
        debug!("Job queued for tree owner");

        reply_rx
            .await
            .map_err(|_| ProbeError::ChannelClosed("job ended without a reply".into()))
    }

    /// Whether the owner thread has stopped accepting jobs.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_runs_job_and_returns_result() {
        let (dispatcher, _handle) = Dispatcher::spawn(4, || 41u32).unwrap();
        let value = dispatcher
            .run(|state| {
                *state += 1;
                *state
            })
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_jobs_run_on_owner_thread() {
        let (dispatcher, _handle) = Dispatcher::spawn(4, || ()).unwrap();
        let name = dispatcher
            .run(|_| thread::current().name().map(str::to_string))
            .await
            .unwrap();
        assert_eq!(name.as_deref(), Some(OWNER_THREAD_NAME));
    }

    #[tokio::test]
    async fn test_jobs_run_in_order() {
        let (dispatcher, _handle) = Dispatcher::spawn(16, Vec::<u32>::new).unwrap();
        // Queue every job without waiting for replies.
        for i in 0..10u32 {
            let job: Job<Vec<u32>> = Box::new(move |log: &mut Vec<u32>| log.push(i));
            dispatcher.tx.send(job).await.unwrap();
        }
        let log = dispatcher.run(|log| log.clone()).await.unwrap();
        assert_eq!(log, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_state_is_not_shared_between_dispatchers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (a, _ha) = Dispatcher::spawn(1, || "a").unwrap();
        let (b, _hb) = Dispatcher::spawn(1, || "b").unwrap();
        for dispatcher in [&a, &b] {
            let seen = Arc::clone(&seen);
            dispatcher
                .run(move |state| seen.lock().unwrap().push(*state))
                .await
                .unwrap();
        }
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_panicking_job_reports_closed_and_owner_survives() {
        let (dispatcher, _handle) = Dispatcher::spawn(4, || 0u8).unwrap();
        let err = dispatcher
            .run(|_| -> u8 { panic!("boom") })
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::ChannelClosed(_)));
        assert_eq!(dispatcher.run(|s| *s).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_when_handles_dropped() {
        let (dispatcher, handle) = Dispatcher::spawn(4, || 0u8).unwrap();
        let keep = dispatcher.clone();
        drop(dispatcher);
        assert!(!keep.is_closed());
        drop(keep);
        tokio::task::spawn_blocking(move || handle.join().unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_after_owner_exit_fails() {
        let (dispatcher, handle) = Dispatcher::spawn(4, || -> u8 { panic!("init failed") }).unwrap();
        let joined = tokio::task::spawn_blocking(move || handle.join()).await.unwrap();
        assert!(joined.is_err());
        assert!(dispatcher.is_closed());

        let err = dispatcher.run(|s| *s).await.unwrap_err();
        assert!(matches!(err, ProbeError::ChannelClosed(_)));
    }
}
