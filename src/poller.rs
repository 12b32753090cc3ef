//! Bounded constant-interval polling of identity verification.
//!
//! A poll attempt that comes back `false` is retried every `interval` until
//! `max_time` has elapsed since the first attempt. Elapsed time is taken when
//! an attempt starts, so an attempt that began inside the window is always
//! followed by one more, and the sleep before it is clamped to what was left of
//! the window at that start. Running out of time is not an error: the poll
//! simply returns `false`. Errors from an attempt end the poll immediately.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::error::{SesError, SesResult};
use crate::services::VerificationApi;

/// Constant backoff without jitter, bounded by total elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantBackoff {
    /// Sleep between attempts.
    pub interval: Duration,
    /// An attempt that starts this late is the last one.
    pub max_time: Duration,
}

/// Verification status check: every 5 seconds for up to a minute.
pub const STATUS_CHECK: ConstantBackoff = ConstantBackoff {
    interval: Duration::from_secs(5),
    max_time: Duration::from_secs(60),
};

/// Verification email resend: every 5 seconds for up to 850 seconds.
pub const EMAIL_VERIFICATION: ConstantBackoff = ConstantBackoff {
    interval: Duration::from_secs(5),
    max_time: Duration::from_secs(850),
};

impl ConstantBackoff {
    pub const fn new(interval: Duration, max_time: Duration) -> Self {
        Self { interval, max_time }
    }

    /// Run `attempt` until it yields `true` or the time budget is spent.
    pub async fn poll<F, Fut, E>(&self, mut attempt: F) -> Result<bool, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        let start = Instant::now();
        let mut tries: u32 = 0;

        loop {
            tries += 1;
            let elapsed = start.elapsed();
            if attempt().await? {
                return Ok(true);
            }

            if elapsed >= self.max_time {
                warn!(
                    tries,
                    elapsed_secs = elapsed.as_secs_f64(),
                    "Giving up polling after max time"
                );
                return Ok(false);
            }

            let wait = self.interval.min(self.max_time - elapsed);
            debug!(tries, wait_secs = wait.as_secs_f64(), "Backing off");
            sleep(wait).await;
        }
    }
}

/// Poll `GetIdentityVerificationAttributes` until the identity reports success.
///
/// Returns `Ok(false)` if it is still unverified after [`STATUS_CHECK`]'s
/// window.
pub async fn check_verification_status(
    api: &dyn VerificationApi,
    identity: &str,
) -> SesResult<bool> {
    STATUS_CHECK
        .poll(move || async move {
            let identities = [identity.to_string()];
            let attributes = api.get_identity_verification_attributes(&identities).await?;
            let status = &attributes
                .get(identity)
                .ok_or_else(|| SesError::NotFound {
                    message: format!("No verification attributes returned for {}", identity),
                })?
                .verification_status;

            info!(identity, status = %status, "Verification status");
            Ok(status.as_str().to_lowercase() == "success")
        })
        .await
}

/// Send the verification email, then poll its status; repeat for up to
/// [`EMAIL_VERIFICATION`]'s window.
pub async fn verify_email_identity(api: &dyn VerificationApi, identity: &str) -> SesResult<bool> {
    EMAIL_VERIFICATION
        .poll(move || async move {
            info!(identity, "Sending verification email");
            api.verify_email_identity(identity).await?;
            check_verification_status(api, identity).await
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mocks::MockVerificationApi;
    use crate::types::{VerificationAttributes, VerificationStatus};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn attributes(identity: &str, status: VerificationStatus) -> HashMap<String, VerificationAttributes> {
        HashMap::from([(
            identity.to_string(),
            VerificationAttributes {
                verification_status: status,
                verification_token: None,
            },
        )])
    }

    /// Mock whose status check returns Pending until call number `success_on`.
    fn status_sequence(identity: &'static str, success_on: u32) -> (MockVerificationApi, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut api = MockVerificationApi::new();
        api.expect_get_identity_verification_attributes()
            .withf(move |ids: &[String]| ids.len() == 1 && ids[0] == identity)
            .returning(move |_| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                let status = if n >= success_on {
                    VerificationStatus::Success
                } else {
                    VerificationStatus::Pending
                };
                Ok(attributes(identity, status))
            });
        (api, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_returns_true_once_attempt_succeeds() {
        let backoff = ConstantBackoff::new(Duration::from_secs(5), Duration::from_secs(60));
        let mut calls = 0;
        let start = Instant::now();

        let result: Result<bool, ()> = backoff
            .poll(|| {
                calls += 1;
                let done = calls == 3;
                async move { Ok(done) }
            })
            .await;

        assert_eq!(result, Ok(true));
        assert_eq!(calls, 3);
        assert!(start.elapsed() >= Duration::from_secs(10));
        assert!(start.elapsed() < Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_gives_up_at_max_time_without_error() {
        let backoff = ConstantBackoff::new(Duration::from_secs(5), Duration::from_secs(12));
        let mut calls = 0;
        let start = Instant::now();

        let result: Result<bool, ()> = backoff
            .poll(|| {
                calls += 1;
                async { Ok(false) }
            })
            .await;

        assert_eq!(result, Ok(false));
        // t=0, 5, 10, then a clamped 2s sleep to t=12
        assert_eq!(calls, 4);
        assert!(start.elapsed() >= Duration::from_secs(12));
        assert!(start.elapsed() < Duration::from_secs(13));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_propagates_errors() {
        let mut calls = 0;
        let result: Result<bool, &str> = STATUS_CHECK
            .poll(|| {
                calls += 1;
                async { Err("boom") }
            })
            .await;

        assert_eq!(result, Err("boom"));
        assert_eq!(calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_verification_status_success_within_window() {
        let (api, calls) = status_sequence("user@example.com", 4);

        let verified = check_verification_status(&api, "user@example.com").await.unwrap();

        assert!(verified);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_verification_status_times_out_false() {
        let (api, calls) = status_sequence("user@example.com", u32::MAX);

        let verified = check_verification_status(&api, "user@example.com").await.unwrap();

        assert!(!verified);
        assert_eq!(calls.load(Ordering::SeqCst), 13);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_verification_status_missing_identity_errors() {
        let mut api = MockVerificationApi::new();
        api.expect_get_identity_verification_attributes()
            .times(1)
            .returning(|_| Ok(HashMap::new()));

        let result = check_verification_status(&api, "user@example.com").await;
        assert!(matches!(result, Err(SesError::NotFound { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_email_identity_resends_after_status_window() {
        // first status window (13 checks) stays pending; the 14th check succeeds
        let (mut api, calls) = status_sequence("user@example.com", 14);
        api.expect_verify_email_identity()
            .withf(|email: &str| email == "user@example.com")
            .times(2)
            .returning(|_| Ok(()));

        let verified = verify_email_identity(&api, "user@example.com").await.unwrap();

        assert!(verified);
        assert_eq!(calls.load(Ordering::SeqCst), 14);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_measures_elapsed_from_attempt_start() {
        let backoff = ConstantBackoff::new(Duration::from_secs(5), Duration::from_secs(12));
        let mut starts = Vec::new();
        let origin = Instant::now();

        let result: Result<bool, ()> = backoff
            .poll(|| {
                starts.push(origin.elapsed().as_secs());
                async {
                    sleep(Duration::from_secs(4)).await;
                    Ok(false)
                }
            })
            .await;

        assert_eq!(result, Ok(false));
        // the attempt starting at 9 began inside the window, so 16 still runs
        assert_eq!(starts, vec![0, 9, 16]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_email_identity_gives_up_false_after_window() {
        let (mut api, calls) = status_sequence("user@example.com", u32::MAX);
        let sends = Arc::new(AtomicU32::new(0));
        let counter = sends.clone();
        api.expect_verify_email_identity().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let start = Instant::now();

        let verified = verify_email_identity(&api, "user@example.com").await.unwrap();

        assert!(!verified);
        // each attempt spends 60s in the status check; sends start at 0, 65, ..., 910
        assert_eq!(sends.load(Ordering::SeqCst), 15);
        assert_eq!(calls.load(Ordering::SeqCst), 15 * 13);
        assert_eq!(start.elapsed().as_secs(), 970);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_email_identity_propagates_send_failure() {
        let mut api = MockVerificationApi::new();
        api.expect_verify_email_identity().times(1).returning(|_| {
            Err(SesError::Validation {
                message: "Invalid email address".to_string(),
                field: None,
            })
        });

        let result = verify_email_identity(&api, "not-an-email").await;
        assert!(matches!(result, Err(SesError::Validation { .. })));
    }
}
