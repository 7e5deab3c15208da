//! Scripted [`Bluesky`] double. Pages and follow outcomes are queued up front
//! and every call is recorded so tests can assert on what was (not) requested.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Bluesky, BlueskyError, FollowRecord, RawActor, Result, SearchActorsPage, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub query: String,
    pub limit: u32,
    pub cursor: Option<String>,
}

#[derive(Default)]
pub struct StubBluesky {
    pages: Mutex<HashMap<String, VecDeque<Result<SearchActorsPage>>>>,
    follows: Mutex<HashMap<String, BlueskyError>>,
    login_error: Mutex<Option<BlueskyError>>,
    search_calls: Mutex<Vec<SearchCall>>,
    follow_calls: Mutex<Vec<String>>,
    login_calls: Mutex<Vec<String>>,
}

pub fn actor(did: &str) -> RawActor {
    RawActor {
        did: did.to_string(),
        handle: format!("{}.bsky.social", did.trim_start_matches("did:plc:")),
        display_name: None,
        description: None,
        avatar: None,
        followers_count: None,
    }
}

pub fn page(dids: &[&str], cursor: Option<&str>) -> SearchActorsPage {
    SearchActorsPage {
        actors: dids.iter().map(|did| actor(did)).collect(),
        cursor: cursor.map(str::to_string),
    }
}

impl StubBluesky {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next search response for `query`. Unscripted queries get an
    /// empty page.
    pub fn with_page(self, query: &str, page: Result<SearchActorsPage>) -> Self {
        self.pages
            .lock()
            .unwrap()
            .entry(query.to_string())
            .or_default()
            .push_back(page);
        self
    }

    /// Make follows of `did` fail with `error`. Unscripted dids succeed.
    pub fn with_follow_error(self, did: &str, error: BlueskyError) -> Self {
        self.follows.lock().unwrap().insert(did.to_string(), error);
        self
    }

    pub fn with_login_error(self, error: BlueskyError) -> Self {
        *self.login_error.lock().unwrap() = Some(error);
        self
    }

    pub fn search_calls(&self) -> Vec<SearchCall> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn follow_calls(&self) -> Vec<String> {
        self.follow_calls.lock().unwrap().clone()
    }

    pub fn login_calls(&self) -> Vec<String> {
        self.login_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bluesky for StubBluesky {
    async fn search_actors(
        &self,
        query: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<SearchActorsPage> {
        self.search_calls.lock().unwrap().push(SearchCall {
            query: query.to_string(),
            limit,
            cursor: cursor.map(str::to_string),
        });

        self.pages
            .lock()
            .unwrap()
            .get_mut(query)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(SearchActorsPage::default()))
    }

    async fn authenticate(&self, handle: &str, _app_password: &str) -> Result<Session> {
        self.login_calls.lock().unwrap().push(handle.to_string());

        if let Some(err) = self.login_error.lock().unwrap().clone() {
            return Err(err);
        }

        Ok(Session {
            did: "did:plc:stub-self".to_string(),
            handle: handle.to_string(),
            access_jwt: "stub-token".to_string(),
        })
    }

    async fn create_follow(&self, _session: &Session, did: &str) -> Result<FollowRecord> {
        self.follow_calls.lock().unwrap().push(did.to_string());

        match self.follows.lock().unwrap().get(did) {
            Some(err) => Err(err.clone()),
            None => Ok(FollowRecord {
                uri: Some(format!(
                    "at://did:plc:stub-self/app.bsky.graph.follow/{}",
                    did.trim_start_matches("did:plc:")
                )),
            }),
        }
    }
}
