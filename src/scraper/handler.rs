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
    bluesky::Bluesky,
    error::AppError,
    response::ApiResponse,
    scraper::{ScrapeRequest, ScrapeResponse, Scraper},
};

/// Scrape accounts by keyword with pagination
/// POST /scrape
pub async fn scrape(
    State(bluesky): State<Arc<dyn Bluesky>>,
    State(shutdown): State<CancellationToken>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    info!(
        "Received scrape request for {} keywords",
        payload.keywords.len()
    );

    let response = run_scrape(bluesky, payload, shutdown.child_token()).await;

    Ok(ApiResponse::success(response))
}

pub async fn run_scrape(
    bluesky: Arc<dyn Bluesky>,
    request: ScrapeRequest,
    cancel: CancellationToken,
) -> ScrapeResponse {
    let mut scraper = Scraper::new(
        bluesky,
        request.max_pages,
        Duration::from_secs(request.delay),
        cancel,
    );

    let accounts = scraper.scrape_multiple_keywords(&request.keywords).await;
    let total_scraped = accounts.len();
    let unique = scraper.deduplicate(accounts, &request.seen_dids);

    ScrapeResponse {
        total_scraped,
        unique_accounts: unique.len(),
        duplicates_removed: total_scraped - unique.len(),
        keywords_processed: request.keywords.len(),
        accounts: unique,
    }
}
