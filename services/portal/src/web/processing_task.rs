//! services/portal/src/web/processing_task.rs
//!
//! The simulated "processing" step in front of case analysis and form submission.
//!
//! The work runs in a spawned task after a fixed delay. The request that started
//! it holds a drop guard on the task's cancellation token, so a client that goes
//! away before the delay elapses cancels the work before it has any effect.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Processing was cancelled")]
    Cancelled,
    #[error("Processing task failed: {0}")]
    Failed(String),
}

/// Waits for `delay`, then runs `work`. Returns `None` if `token` is cancelled first,
/// in which case `work` is never polled.
pub async fn run_after_delay<T>(
    delay: Duration,
    token: CancellationToken,
    work: impl Future<Output = T>,
) -> Option<T> {
    tokio::select! {
        _ = token.cancelled() => {
            info!("Processing cancelled before the delay elapsed.");
            None
        }
        _ = tokio::time::sleep(delay) => {
            debug!("Processing delay of {:?} elapsed.", delay);
            Some(work.await)
        }
    }
}

/// Spawns `work` behind the processing delay and waits for it. Dropping the
/// returned future cancels the task.
pub async fn process<T, F>(delay: Duration, work: F) -> Result<T, ProcessingError>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let token = CancellationToken::new();
    let _guard = token.clone().drop_guard();
    let handle = tokio::spawn(run_after_delay(delay, token, work));

    match handle.await {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(ProcessingError::Cancelled),
        Err(e) => Err(ProcessingError::Failed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn work_runs_after_the_delay() {
        let result = process(Duration::from_millis(5), async { 42 }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn cancelled_token_skips_the_work() {
        let ran = Arc::new(AtomicBool::new(false));
        let token = CancellationToken::new();
        token.cancel();

        let flag = ran.clone();
        let result = run_after_delay(Duration::from_secs(30), token, async move {
            flag.store(true, Ordering::SeqCst);
        })
        .await;

        assert!(result.is_none());
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn dropping_the_request_cancels_the_task() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let request = tokio::spawn(async move {
            process(Duration::from_millis(50), async move {
                flag.store(true, Ordering::SeqCst);
            })
            .await
        });

        tokio::time::sleep(Duration::from_millis(5)).await;
        request.abort();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(!ran.load(Ordering::SeqCst));
    }
}
