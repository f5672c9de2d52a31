//! Synchronous handoff to the thread that owns accessibility access.
//!
//! The platform accessibility API is documented as unsafe for concurrent
//! use, so every tree read and action invocation runs on one dedicated
//! worker thread. Query-serving threads submit closures and block until the
//! worker signals completion; the caller has no useful work to do before
//! the snapshot exists. The wait is bounded: an application whose
//! accessibility server has hung must not stall queries forever.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use thiserror::Error;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Errors from the UI-thread handoff.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The worker did not complete the job within the bounded wait.
    #[error("timed out after {0:?} waiting for the accessibility thread")]
    Timeout(Duration),

    /// The worker thread has shut down.
    #[error("accessibility thread is gone")]
    Closed,
}

/// A single dedicated execution context for accessibility calls.
///
/// Jobs are executed strictly in submission order on one named thread.
/// Dropping the dispatcher closes the queue and joins the worker.
pub struct UiDispatcher {
    tx: Option<mpsc::Sender<Job>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl UiDispatcher {
    /// Spawn the worker thread.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let worker = thread::Builder::new()
            .name("menubar-ax".into())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    job();
                }
                log::debug!("accessibility thread exiting");
            })
            .expect("failed to spawn accessibility thread");
        UiDispatcher {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Run `job` on the worker thread, blocking up to `timeout` for its
    /// result.
    ///
    /// On timeout the job is not aborted: it still runs to completion on
    /// the worker, and its result is dropped when the send to the
    /// abandoned rendezvous channel fails. Resources held by that result
    /// (retained node handles in a snapshot) are released normally at that
    /// point.
    pub fn run<T, F>(&self, timeout: Duration, job: F) -> Result<T, DispatchError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let tx = self.tx.as_ref().ok_or(DispatchError::Closed)?;
        let (done_tx, done_rx) = mpsc::sync_channel::<T>(1);
        tx.send(Box::new(move || {
            let _ = done_tx.send(job());
        }))
        .map_err(|_| DispatchError::Closed)?;

        done_rx.recv_timeout(timeout).map_err(|e| match e {
            mpsc::RecvTimeoutError::Timeout => DispatchError::Timeout(timeout),
            mpsc::RecvTimeoutError::Disconnected => DispatchError::Closed,
        })
    }
}

impl Default for UiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for UiDispatcher {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_runs_job_and_returns_result() {
        let dispatcher = UiDispatcher::new();
        let out = dispatcher.run(WAIT, || 21 * 2).unwrap();
        assert_eq!(out, 42);
    }

    #[test]
    fn test_jobs_run_on_the_named_worker_thread() {
        let dispatcher = UiDispatcher::new();
        let name = dispatcher
            .run(WAIT, || thread::current().name().map(String::from))
            .unwrap();
        assert_eq!(name.as_deref(), Some("menubar-ax"));
    }

    #[test]
    fn test_jobs_execute_in_submission_order() {
        let dispatcher = UiDispatcher::new();
        let seen = Arc::new(AtomicU32::new(0));
        for expected in 0..10 {
            let seen = Arc::clone(&seen);
            let got = dispatcher
                .run(WAIT, move || seen.fetch_add(1, Ordering::SeqCst))
                .unwrap();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_slow_job_times_out_without_killing_the_worker() {
        let dispatcher = UiDispatcher::new();
        let err = dispatcher
            .run(Duration::from_millis(10), || {
                thread::sleep(Duration::from_millis(200));
                "late"
            })
            .unwrap_err();
        assert!(matches!(err, DispatchError::Timeout(_)));

        // The worker drains the slow job and keeps serving.
        let out = dispatcher.run(WAIT, || "next").unwrap();
        assert_eq!(out, "next");
    }

    #[test]
    fn test_drop_joins_worker() {
        let ran = Arc::new(AtomicU32::new(0));
        {
            let dispatcher = UiDispatcher::new();
            let ran = Arc::clone(&ran);
            dispatcher
                .run(WAIT, move || {
                    ran.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
