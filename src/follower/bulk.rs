use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::outcome::{FollowFailure, FollowResult, FollowSummary};
use crate::accounts::FollowTarget;
use crate::bluesky::{Bluesky, BlueskyError, Session};
use crate::pacing::pause;

/// Where a batch ended up. `Running` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchState {
    Running,
    /// A rate-limited result halted the batch.
    Stopped,
    Completed,
    Cancelled,
}

#[derive(Debug, Serialize)]
pub struct FollowBatch {
    pub results: Vec<FollowResult>,
    pub summary: FollowSummary,
}

/// A logged-in account that follows others one at a time.
pub struct Follower {
    bluesky: Arc<dyn Bluesky>,
    session: Session,
    delay: Duration,
    cancel: CancellationToken,
}

impl Follower {
    /// Authenticate once. A failed login leaves no follower behind.
    pub async fn login(
        bluesky: Arc<dyn Bluesky>,
        handle: &str,
        app_password: &str,
        delay: Duration,
        cancel: CancellationToken,
    ) -> Result<Self, BlueskyError> {
        info!("Logging in as {}", handle);

        let session = match bluesky.authenticate(handle, app_password).await {
            Ok(session) => session,
            Err(e) => {
                error!("Login failed: {}", e);
                return Err(e);
            }
        };

        info!(did = %session.did, "Login successful");

        Ok(Self {
            bluesky,
            session,
            delay,
            cancel,
        })
    }

    pub fn handle(&self) -> &str {
        &self.session.handle
    }

    /// Follow a single account. Failures are classified and returned, never raised.
    pub async fn follow_user(&self, did: &str, handle: Option<String>) -> FollowResult {
        match self.bluesky.create_follow(&self.session, did).await {
            Ok(record) => FollowResult::followed(did, handle, record.uri),
            Err(e) => FollowResult::failed(
                Some(did.to_string()),
                handle,
                FollowFailure::from_remote(e.to_string()),
            ),
        }
    }

    /// Follow `accounts` in order, at most `max_follows` of them.
    ///
    /// The first rate-limited result ends the batch; later accounts are
    /// neither attempted nor reported. The delay only follows a successful
    /// follow with more accounts still queued.
    pub async fn follow_bulk(
        &self,
        accounts: &[Map<String, Value>],
        max_follows: Option<usize>,
    ) -> FollowBatch {
        let targets: Vec<FollowTarget> = accounts
            .iter()
            .take(max_follows.unwrap_or(usize::MAX))
            .map(FollowTarget::from_record)
            .collect();
        let total = targets.len();

        let mut results = Vec::with_capacity(total);
        let mut state = BatchState::Running;

        info!("Starting bulk follow: {} accounts", total);
        info!("Rate limit: {}s between requests", self.delay.as_secs());

        for (i, target) in targets.into_iter().enumerate() {
            let n = i + 1;

            if self.cancel.is_cancelled() {
                state = BatchState::Cancelled;
                break;
            }

            let Some(did) = target.did else {
                warn!("[{}/{}] Skipping - no DID found", n, total);
                results.push(FollowResult::failed(
                    None,
                    target.handle,
                    FollowFailure::MissingDid,
                ));
                continue;
            };

            info!(
                "[{}/{}] Following {}",
                n,
                total,
                target.handle.as_deref().unwrap_or(&did)
            );

            let result = self.follow_user(&did, target.handle).await;
            let succeeded = result.success;

            match &result.failure {
                None => info!("[{}/{}] Success", n, total),
                Some(FollowFailure::AlreadyFollowing) => {
                    info!("[{}/{}] Already following", n, total)
                }
                Some(FollowFailure::RateLimited) => {
                    warn!(did = %did, "[{}/{}] RATE LIMITED - stopping", n, total)
                }
                Some(failure) => error!(did = %did, "[{}/{}] Failed: {}", n, total, failure),
            }

            let rate_limited = result.is_rate_limited();
            results.push(result);

            if rate_limited {
                state = BatchState::Stopped;
                break;
            }

            if succeeded && n < total && !pause(self.delay, &self.cancel).await {
                state = BatchState::Cancelled;
                break;
            }
        }

        if state == BatchState::Running {
            state = BatchState::Completed;
        }

        let summary = FollowSummary::from_results(&results, state == BatchState::Cancelled);
        info!(
            ?state,
            "Follow summary: {} successful, {} already following, {} failed, {} rate limited",
            summary.successful,
            summary.already_following,
            summary.failed,
            summary.rate_limited
        );

        FollowBatch { results, summary }
    }
}
