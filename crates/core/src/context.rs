//! Cancellation context for venue calls.
//!
//! A [`Context`] is handed to every long-running exchange operation. When the
//! paired [`CancelHandle`] fires, [`Context::run`] drops the in-flight future
//! (which aborts the underlying request) and returns
//! [`VenueLinkError::Cancelled`].

use std::future::Future;

use tokio::sync::watch;

use crate::error::{Result, VenueLinkError};

#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel_rx: Option<watch::Receiver<bool>>,
}

#[derive(Debug)]
pub struct CancelHandle {
    cancel_tx: watch::Sender<bool>,
}

impl Context {
    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self { cancel_rx: None }
    }

    pub fn with_cancel() -> (Self, CancelHandle) {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        (
            Self {
                cancel_rx: Some(cancel_rx),
            },
            CancelHandle { cancel_tx },
        )
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_rx
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(VenueLinkError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves once the context is cancelled. Never resolves for a
    /// background context, or once every handle has been dropped without
    /// cancelling.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.cancel_rx else {
            return std::future::pending().await;
        };

        let mut rx = rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return std::future::pending().await;
            }
        }
    }

    /// Drive `fut` to completion unless the context is cancelled first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(VenueLinkError::Cancelled),
            result = fut => result,
        }
    }
}

impl CancelHandle {
    pub fn cancel(&self) {
        // send_replace succeeds even when every receiver is gone
        self.cancel_tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_background_context_runs_future() {
        let ctx = Context::background();
        assert!(!ctx.is_cancelled());

        let value = ctx.run(async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_cancelled_context_skips_future() {
        let (ctx, handle) = Context::with_cancel();
        handle.cancel();

        let result: Result<()> = ctx
            .run(async { panic!("future must not be polled after cancellation") })
            .await;

        assert!(matches!(result, Err(VenueLinkError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_future() {
        let (ctx, handle) = Context::with_cancel();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        });

        let result: Result<()> = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .await;

        canceller.await.unwrap();
        assert!(matches!(result, Err(VenueLinkError::Cancelled)));
    }

    #[tokio::test]
    async fn test_dropped_handle_never_cancels() {
        let (ctx, handle) = Context::with_cancel();
        drop(handle);

        let value = ctx.run(async { Ok("done") }).await.unwrap();
        assert_eq!(value, "done");
        assert!(!ctx.is_cancelled());
    }
}
