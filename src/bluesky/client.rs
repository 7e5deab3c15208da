use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use super::{Bluesky, BlueskyError, FollowRecord, Result, SearchActorsPage, Session};

const FOLLOW_COLLECTION: &str = "app.bsky.graph.follow";

/// XRPC client speaking to a PDS (login, writes) and an AppView (search).
pub struct XrpcClient {
    client: reqwest::Client,
    service_url: String,
    appview_url: String,
}

/// Error body shared by all XRPC endpoints.
#[derive(Debug, Deserialize)]
struct XrpcErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl XrpcClient {
    pub fn new(service_url: &str, appview_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bluesky-automation/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            service_url: service_url.to_string(),
            appview_url: appview_url.to_string(),
        })
    }

    fn endpoint(base: &str, nsid: &str) -> String {
        format!("{}/xrpc/{}", base, nsid)
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        Ok(resp.json().await?)
    }
}

/// Map a non-2xx XRPC response onto [`BlueskyError`].
fn api_error(status: StatusCode, body: &str) -> BlueskyError {
    let message = match serde_json::from_str::<XrpcErrorBody>(body) {
        Ok(XrpcErrorBody {
            error: Some(error),
            message: Some(message),
        }) => format!("{}: {}", error, message),
        Ok(XrpcErrorBody {
            error: Some(text), ..
        })
        | Ok(XrpcErrorBody {
            message: Some(text),
            ..
        }) => text,
        _ if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
        _ => body.trim().to_string(),
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => BlueskyError::RateLimited(message),
        _ => BlueskyError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl Bluesky for XrpcClient {
    async fn search_actors(
        &self,
        query: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<SearchActorsPage> {
        let url = Self::endpoint(&self.appview_url, "app.bsky.actor.searchActors");
        let limit = limit.to_string();
        let mut params = vec![("q", query), ("limit", limit.as_str())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }

        let resp = self.client.get(&url).query(&params).send().await?;
        Self::parse(resp).await
    }

    async fn authenticate(&self, handle: &str, app_password: &str) -> Result<Session> {
        let url = Self::endpoint(&self.service_url, "com.atproto.server.createSession");
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "identifier": handle, "password": app_password }))
            .send()
            .await?;

        Self::parse(resp).await.map_err(|e| match e {
            BlueskyError::Api { status, message } if status == 400 || status == 401 => {
                BlueskyError::Authentication(message)
            }
            other => other,
        })
    }

    async fn create_follow(&self, session: &Session, did: &str) -> Result<FollowRecord> {
        let url = Self::endpoint(&self.service_url, "com.atproto.repo.createRecord");
        let body = json!({
            "repo": session.did,
            "collection": FOLLOW_COLLECTION,
            "record": {
                "$type": FOLLOW_COLLECTION,
                "subject": did,
                "createdAt": Utc::now().to_rfc3339(),
            },
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&session.access_jwt)
            .json(&body)
            .send()
            .await?;

        Self::parse(resp).await
    }
}
