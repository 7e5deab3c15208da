use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::accounts::Account;

pub mod dedup;
pub mod handler;
mod search;

pub use search::Scraper;

fn default_max_pages() -> u32 {
    5
}

fn default_delay() -> u64 {
    2
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScrapeRequest {
    pub keywords: Vec<String>,
    #[serde(default = "default_max_pages")]
    #[validate(range(min = 1, message = "max_pages must be at least 1"))]
    pub max_pages: u32,
    /// Seconds between page requests and between keywords.
    #[serde(default = "default_delay")]
    pub delay: u64,
    /// Identifiers returned by earlier runs; matching accounts are dropped.
    #[serde(default)]
    pub seen_dids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub total_scraped: usize,
    pub unique_accounts: usize,
    pub duplicates_removed: usize,
    pub keywords_processed: usize,
    pub accounts: Vec<Account>,
}
