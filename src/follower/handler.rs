use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use tokio_util::sync::CancellationToken;
use tracing::info;
use validator::Validate;

use crate::{
    bluesky::{Bluesky, BlueskyError},
    error::AppError,
    follower::{FollowBatch, FollowRequest, Follower},
    response::ApiResponse,
};

/// Follow a list of accounts with rate limiting
/// POST /follow
pub async fn follow(
    State(bluesky): State<Arc<dyn Bluesky>>,
    State(shutdown): State<CancellationToken>,
    payload: Result<Json<FollowRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    info!(
        "Received follow request for {} accounts",
        payload.accounts.len()
    );

    let batch = run_follow(bluesky, payload, shutdown.child_token()).await?;

    Ok(ApiResponse::success(batch))
}

/// Log in, then follow. Only a failed login is an error; everything that
/// happens per account is reported inside the batch.
pub async fn run_follow(
    bluesky: Arc<dyn Bluesky>,
    request: FollowRequest,
    cancel: CancellationToken,
) -> Result<FollowBatch, BlueskyError> {
    let follower = Follower::login(
        bluesky,
        &request.handle,
        &request.app_password,
        Duration::from_secs(request.delay),
        cancel,
    )
    .await?;

    let batch = follower
        .follow_bulk(&request.accounts, request.max_follows)
        .await;

    info!(
        handle = follower.handle(),
        attempted = batch.summary.total_attempted,
        "Bulk follow finished"
    );

    Ok(batch)
}
