//! Access to the Bluesky network.
//!
//! The pipelines only ever talk to the [`Bluesky`] capability trait; the XRPC
//! implementation lives in [`client`] and a scripted double for tests in
//! `testing`.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

pub mod client;
pub mod error;
#[cfg(test)]
pub mod testing;

pub use client::XrpcClient;
pub use error::{BlueskyError, Result};

/// Maximum page size accepted by `app.bsky.actor.searchActors`.
pub const SEARCH_PAGE_LIMIT: u32 = 100;

#[async_trait]
pub trait Bluesky: Send + Sync {
    /// Fetch one page of actors matching `query`, continuing from `cursor`.
    async fn search_actors(
        &self,
        query: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<SearchActorsPage>;

    /// Open a session for `handle` using an app password.
    async fn authenticate(&self, handle: &str, app_password: &str) -> Result<Session>;

    /// Create a follow record from the session's account to `did`.
    async fn create_follow(&self, session: &Session, did: &str) -> Result<FollowRecord>;
}

/// An actor as returned by search. Only `did` and `handle` are guaranteed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActor {
    pub did: String,
    pub handle: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub followers_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchActorsPage {
    #[serde(default)]
    pub actors: Vec<RawActor>,
    pub cursor: Option<String>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub did: String,
    pub handle: String,
    pub access_jwt: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("did", &self.did)
            .field("handle", &self.handle)
            .field("access_jwt", &"<redacted>")
            .finish()
    }
}

/// Reference to a created `app.bsky.graph.follow` record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowRecord {
    pub uri: Option<String>,
}
