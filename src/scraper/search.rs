use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::dedup::{self, SeenSet};
use crate::accounts::Account;
use crate::bluesky::{Bluesky, SEARCH_PAGE_LIMIT};
use crate::pacing::pause;

/// Walks the actor search for one or more keywords.
///
/// A scraper is built per request. Its seen-set lives as long as the
/// instance, so repeated [`Scraper::deduplicate`] calls also drop accounts
/// returned by earlier calls.
pub struct Scraper {
    bluesky: Arc<dyn Bluesky>,
    max_pages: u32,
    delay: Duration,
    seen: SeenSet,
    cancel: CancellationToken,
}

impl Scraper {
    pub fn new(
        bluesky: Arc<dyn Bluesky>,
        max_pages: u32,
        delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            bluesky,
            max_pages,
            delay,
            seen: SeenSet::new(),
            cancel,
        }
    }

    /// Collect up to `max_pages` pages for `keyword`. A failed request ends
    /// this keyword but keeps everything gathered so far.
    pub async fn scrape_keyword(&self, keyword: &str) -> Vec<Account> {
        let mut accounts = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 0;

        info!("Scraping keyword: '{}'", keyword);

        while page < self.max_pages {
            if self.cancel.is_cancelled() {
                warn!(keyword, page = page + 1, "Scrape cancelled before page request");
                break;
            }

            let response = match self
                .bluesky
                .search_actors(keyword, SEARCH_PAGE_LIMIT, cursor.as_deref())
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    error!(keyword, page = page + 1, "Search failed: {}", e);
                    break;
                }
            };

            if response.actors.is_empty() {
                info!(keyword, "No more results at page {}", page + 1);
                break;
            }

            let found = response.actors.len();
            accounts.extend(
                response
                    .actors
                    .into_iter()
                    .map(|actor| Account::from_actor(actor, keyword)),
            );

            page += 1;
            info!(
                keyword,
                "Page {}: Found {} accounts (Total: {})",
                page,
                found,
                accounts.len()
            );

            cursor = response.cursor.filter(|c| !c.is_empty());
            if cursor.is_none() {
                info!(keyword, "Reached end of results at page {}", page);
                break;
            }

            if page < self.max_pages && !pause(self.delay, &self.cancel).await {
                warn!(keyword, page, "Scrape cancelled while waiting for next page");
                break;
            }
        }

        info!(
            "Completed '{}': {} accounts across {} pages",
            keyword,
            accounts.len(),
            page
        );
        accounts
    }

    /// Scrape each keyword in order and concatenate the results.
    pub async fn scrape_multiple_keywords(&self, keywords: &[String]) -> Vec<Account> {
        let mut all_accounts = Vec::new();

        info!("Starting scrape for {} keywords", keywords.len());
        info!(
            "Settings: Max {} pages/keyword, {}s delay",
            self.max_pages,
            self.delay.as_secs()
        );

        for (i, keyword) in keywords.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(
                    "Scrape cancelled with {} of {} keywords remaining",
                    keywords.len() - i,
                    keywords.len()
                );
                break;
            }

            info!("[{}/{}] Processing '{}'", i + 1, keywords.len(), keyword);
            all_accounts.extend(self.scrape_keyword(keyword).await);

            if i + 1 < keywords.len() && !pause(self.delay, &self.cancel).await {
                warn!("Scrape cancelled between keywords");
                break;
            }
        }

        info!("Total accounts scraped: {}", all_accounts.len());
        all_accounts
    }

    /// Seed the seen-set with `seen_dids`, then drop every account already
    /// seen, including repeats earlier in `accounts`.
    pub fn deduplicate(&mut self, accounts: Vec<Account>, seen_dids: &[String]) -> Vec<Account> {
        self.seen.extend(seen_dids);

        let total = accounts.len();
        let (unique, seen) = dedup::deduplicate(accounts, std::mem::take(&mut self.seen));
        self.seen = seen;

        info!(
            seen = self.seen.len(),
            "Deduplication: {} unique, {} duplicates removed",
            unique.len(),
            total - unique.len()
        );
        unique
    }
}
