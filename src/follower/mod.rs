use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

mod bulk;
pub mod handler;
pub mod outcome;

pub use bulk::{FollowBatch, Follower};

fn default_delay() -> u64 {
    5
}

/// Request payload for a bulk follow run.
/// Intentionally not `Debug`: it carries the app password.
#[derive(Deserialize, Validate)]
pub struct FollowRequest {
    #[validate(length(min = 1, message = "handle must not be empty"))]
    pub handle: String,
    #[validate(length(min = 1, message = "app_password must not be empty"))]
    pub app_password: String,
    /// Raw account records, as produced by the scraper or edited by hand.
    pub accounts: Vec<Map<String, Value>>,
    /// Seconds to wait after each successful follow.
    #[serde(default = "default_delay")]
    pub delay: u64,
    #[validate(range(min = 1, message = "max_follows must be at least 1"))]
    pub max_follows: Option<usize>,
}
