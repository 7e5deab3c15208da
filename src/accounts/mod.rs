use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::bluesky::RawActor;

const PROFILE_BASE_URL: &str = "https://bsky.app/profile";
const MISSING_TEXT: &str = "N/A";

/// A discovered profile. Identity is the `did`; everything else is informational.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub did: String,
    pub handle: String,
    pub display_name: String,
    pub description: String,
    pub avatar: String,
    pub followers_count: u64,
    pub profile_url: String,
    pub keyword: String,
    pub scraped_at: DateTime<Utc>,
}

impl Account {
    pub fn from_actor(actor: RawActor, keyword: &str) -> Self {
        let profile_url = profile_url(&actor.handle);
        Account {
            did: actor.did,
            handle: actor.handle,
            display_name: actor.display_name.unwrap_or_else(|| MISSING_TEXT.to_string()),
            description: actor.description.unwrap_or_else(|| MISSING_TEXT.to_string()),
            avatar: actor.avatar.unwrap_or_default(),
            followers_count: actor.followers_count.unwrap_or(0),
            profile_url,
            keyword: keyword.to_string(),
            scraped_at: Utc::now(),
        }
    }
}

pub fn profile_url(handle: &str) -> String {
    format!("{}/{}", PROFILE_BASE_URL, handle)
}

/// The canonical shape of a caller-supplied account record on the follow path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowTarget {
    pub did: Option<String>,
    pub handle: Option<String>,
}

impl FollowTarget {
    /// Accepts both `did`/`DID` and `handle`/`Handle`. Key names are
    /// case-sensitive; the lowercase key wins unless it is absent, empty or
    /// not a string.
    pub fn from_record(record: &Map<String, Value>) -> Self {
        FollowTarget {
            did: first_text(record, &["did", "DID"]),
            handle: first_text(record, &["handle", "Handle"]),
        }
    }
}

fn first_text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
