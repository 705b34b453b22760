//! Bounded polling
//!
//! The UI refreshes asynchronously, so a value read right after an action may
//! still reflect the old state. [`poll_until`] re-evaluates a probe until it
//! yields a value or the deadline passes. The probe runs at least once even
//! with a zero timeout.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::debug;

use crate::error::{E2eError, E2eResult};

/// Timeout and poll interval for a convergence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

/// Poll `probe` until it returns `Ok(Some(value))`.
///
/// `Ok(None)` means "not yet". Errors for which [`E2eError::is_transient`]
/// holds are retried like `Ok(None)`; any other error is returned at once.
/// When the deadline passes the result is [`E2eError::Timeout`] naming
/// `what`, plus the last transient error if there was one.
pub async fn poll_until<T, F, Fut>(what: &str, policy: RetryPolicy, mut probe: F) -> E2eResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<Option<T>>>,
{
    let start = Instant::now();
    let mut attempts = 0usize;
    let mut last_error: Option<E2eError> = None;

    loop {
        attempts += 1;

        match probe().await {
            Ok(Some(value)) => {
                debug!("{} settled after {} attempt(s)", what, attempts);
                return Ok(value);
            }
            Ok(None) => last_error = None,
            Err(e) if e.is_transient() => last_error = Some(e),
            Err(e) => return Err(e),
        }

        if start.elapsed() >= policy.timeout {
            break;
        }

        sleep(policy.poll_interval).await;
    }

    let detail = match last_error {
        Some(e) => format!("{what} ({attempts} attempts, last error: {e})"),
        None => format!("{what} ({attempts} attempts)"),
    };
    Err(E2eError::Timeout(detail))
}

/// Poll `predicate` until it holds
pub async fn wait_until<F, Fut>(what: &str, policy: RetryPolicy, mut predicate: F) -> E2eResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<bool>>,
{
    poll_until(what, policy, || {
        let check = predicate();
        async move { Ok(check.await?.then_some(())) }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast() -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(200), Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_returns_once_probe_converges() {
        let calls = AtomicUsize::new(0);

        let value = poll_until("counter", fast(), || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok((n >= 3).then_some(n))
        })
        .await
        .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_times_out_when_never_true() {
        let err = wait_until("never", fast(), || async { Ok(false) })
            .await
            .unwrap_err();

        match err {
            E2eError::Timeout(what) => assert!(what.starts_with("never")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_timeout_still_probes_once() {
        let policy = RetryPolicy::new(Duration::ZERO, Duration::from_millis(5));
        let calls = AtomicUsize::new(0);

        let result = wait_until("once", policy, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fatal_error_is_not_retried() {
        let calls = AtomicUsize::new(0);

        let err = wait_until("fatal", fast(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(E2eError::UnknownEmailSubject("Subject Welcome".into()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, E2eError::UnknownEmailSubject(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_error_is_retried() {
        let calls = AtomicUsize::new(0);

        poll_until("transient", fast(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(E2eError::NoEmailSelected)
            } else {
                Ok(Some(()))
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_reports_last_transient_error() {
        let err = poll_until::<(), _, _>("pane", fast(), || async {
            Err(E2eError::NoEmailSelected)
        })
        .await
        .unwrap_err();

        match err {
            E2eError::Timeout(what) => assert!(what.contains("No email selected")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
