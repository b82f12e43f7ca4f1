//! Per-call cancellation and deadline context

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{AdminError, Result};

/// Caller-supplied context bounding a single admin call
///
/// Dropping the returned future also aborts the call; the context adds an
/// explicit token and deadline so the abort is reported as an error.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl CallContext {
    /// Context without deadline and with a fresh cancellation token
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail calls that have not completed within `timeout` from now
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Fail calls that have not completed by `deadline`
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Use an externally owned cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels calls made with this context
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Deadline, if one was set
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail fast if the context is already canceled or past its deadline
    pub fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(AdminError::Canceled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(AdminError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `call` to completion unless canceled or past the deadline
    pub async fn run<F, T>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let bounded = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, call).await {
                    Ok(result) => result,
                    Err(_) => Err(AdminError::DeadlineExceeded),
                },
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(AdminError::Canceled),
            result = bounded => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes() {
        let ctx = CallContext::new().with_timeout(Duration::from_secs(5));
        let value = ctx.run(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_run_canceled_before_start() {
        let ctx = CallContext::new();
        ctx.cancellation_token().cancel();

        let result = ctx.run(async { Ok(()) }).await;
        assert!(matches!(result, Err(AdminError::Canceled)));
    }

    #[tokio::test]
    async fn test_run_canceled_in_flight() {
        let token = CancellationToken::new();
        let ctx = CallContext::new().with_cancellation(token.clone());

        let canceler = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .await;
        canceler.await.unwrap();

        assert!(matches!(result, Err(AdminError::Canceled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_deadline_exceeded() {
        let ctx = CallContext::new().with_timeout(Duration::from_millis(100));

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AdminError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let ctx = CallContext::new();
        let result: Result<()> = ctx
            .run(async { Err(AdminError::invalid_response("boom")) })
            .await;
        assert!(matches!(result, Err(AdminError::InvalidResponse(_))));
    }
}
