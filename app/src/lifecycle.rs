use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CallError;

/// Bounds the remote calls one mounted controller makes.
///
/// Each call gets the same timeout, and every pending or future call is
/// abandoned once the controller is unmounted.
pub struct CallLifecycle {
    timeout: Duration,
    unmounted: watch::Sender<bool>,
}

impl CallLifecycle {
    pub fn new(timeout: Duration) -> Self {
        let (unmounted, _) = watch::channel(false);
        Self { timeout, unmounted }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn unmount(&self) {
        self.unmounted.send_replace(true);
    }

    pub fn is_unmounted(&self) -> bool {
        *self.unmounted.borrow()
    }

    pub async fn run<F, T>(&self, label: &'static str, fut: F) -> Result<T, CallError>
    where
        F: Future<Output = T>,
    {
        let mut rx = self.unmounted.subscribe();
        if *rx.borrow_and_update() {
            return Err(CallError::Cancelled(label));
        }

        let cancelled = async move {
            loop {
                if rx.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
                if *rx.borrow_and_update() {
                    break;
                }
            }
        };

        tokio::select! {
            res = tokio::time::timeout(self.timeout, fut) => res.map_err(|_| {
                warn!(
                    label,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "remote call timed out"
                );
                CallError::TimedOut { label, after: self.timeout }
            }),
            _ = cancelled => {
                debug!(label, "remote call abandoned on unmount");
                Err(CallError::Cancelled(label))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn completed_calls_pass_their_output_through() {
        let calls = CallLifecycle::new(Duration::from_secs(1));
        assert_eq!(calls.run("noop", async { 5 }).await, Ok(5));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_calls_time_out() {
        let calls = CallLifecycle::new(Duration::from_millis(50));
        let res = calls
            .run("hang", std::future::pending::<()>())
            .await;

        assert_eq!(
            res,
            Err(CallError::TimedOut {
                label: "hang",
                after: Duration::from_millis(50)
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_abandons_in_flight_calls() {
        let calls = Arc::new(CallLifecycle::new(Duration::from_secs(60)));

        let pending = {
            let calls = Arc::clone(&calls);
            tokio::spawn(async move { calls.run("hang", std::future::pending::<()>()).await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        calls.unmount();

        assert_eq!(pending.await.unwrap(), Err(CallError::Cancelled("hang")));
        assert!(calls.is_unmounted());
        assert_eq!(
            calls.run("after", async { 1 }).await,
            Err(CallError::Cancelled("after"))
        );
    }
}
