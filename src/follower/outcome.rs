use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// How a failed follow call is treated by the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowErrorKind {
    AlreadyFollowing,
    RateLimited,
    Generic,
}

/// Classify a remote error message. Matching is case-insensitive and
/// "already following" takes priority over "rate limit".
pub fn classify(message: &str) -> FollowErrorKind {
    let lowered = message.to_lowercase();
    if lowered.contains("already following") {
        FollowErrorKind::AlreadyFollowing
    } else if lowered.contains("rate limit") {
        FollowErrorKind::RateLimited
    } else {
        FollowErrorKind::Generic
    }
}

/// Why a follow attempt did not succeed. Serialized as its reason text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowFailure {
    AlreadyFollowing,
    RateLimited,
    MissingDid,
    Generic(String),
}

impl FollowFailure {
    pub fn from_remote(message: String) -> Self {
        match classify(&message) {
            FollowErrorKind::AlreadyFollowing => FollowFailure::AlreadyFollowing,
            FollowErrorKind::RateLimited => FollowFailure::RateLimited,
            FollowErrorKind::Generic => FollowFailure::Generic(message),
        }
    }
}

impl fmt::Display for FollowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowFailure::AlreadyFollowing => f.write_str("Already following"),
            FollowFailure::RateLimited => f.write_str("Rate limited"),
            FollowFailure::MissingDid => f.write_str("No DID provided"),
            FollowFailure::Generic(message) => f.write_str(message),
        }
    }
}

impl Serialize for FollowFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of one follow attempt.
#[derive(Debug, Clone, Serialize)]
pub struct FollowResult {
    pub did: Option<String>,
    pub handle: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub failure: Option<FollowFailure>,
    pub timestamp: DateTime<Utc>,
}

impl FollowResult {
    pub fn followed(did: &str, handle: Option<String>, uri: Option<String>) -> Self {
        Self {
            did: Some(did.to_string()),
            handle,
            success: true,
            uri,
            failure: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(did: Option<String>, handle: Option<String>, failure: FollowFailure) -> Self {
        Self {
            did,
            handle,
            success: false,
            uri: None,
            failure: Some(failure),
            timestamp: Utc::now(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self.failure, Some(FollowFailure::RateLimited))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FollowSummary {
    pub total_attempted: usize,
    pub successful: usize,
    pub already_following: usize,
    pub failed: usize,
    pub rate_limited: usize,
    pub rate_limited_stopped: bool,
    pub cancelled: bool,
}

impl FollowSummary {
    /// Counts are always recomputed from the results they describe.
    pub fn from_results(results: &[FollowResult], cancelled: bool) -> Self {
        let mut summary = FollowSummary {
            total_attempted: results.len(),
            cancelled,
            ..Default::default()
        };

        for result in results {
            match &result.failure {
                None => summary.successful += 1,
                Some(FollowFailure::AlreadyFollowing) => summary.already_following += 1,
                Some(FollowFailure::RateLimited) => summary.rate_limited += 1,
                Some(FollowFailure::MissingDid) | Some(FollowFailure::Generic(_)) => {
                    summary.failed += 1
                }
            }
        }

        summary.rate_limited_stopped = summary.rate_limited > 0;
        summary
    }
}
