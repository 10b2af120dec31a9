//! Run orchestration: load cache, walk every published article's candidate
//! links, fetch each link once, attempt both protocols against the fetched
//! response, and persist the cache on the way out.

use crate::article::{Article, extract_candidate_links};
use crate::cache::{CacheError, LinkCache};
use crate::config::Config;
use crate::fetcher::{build_client, fetch};
use crate::notifier::{send_pingback, send_webmention};
use reqwest::Client;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum RunError {
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Processes every published article and returns the number of successful
/// notifications sent (Pingback and WebMention each count once per link).
///
/// A failed fetch or notification never aborts the run; whatever the loop
/// managed to process is persisted to the cache on the way out.
pub async fn run(articles: &[Article], config: &Config) -> Result<usize, RunError> {
    let started = Instant::now();
    let client = build_client(config)?;
    let mut cache = LinkCache::load_or_default(&config.cache_path);
    let urls_before = cache.total_urls();

    // The loop absorbs every per-link failure, so the save below runs on
    // every path out of processing.
    let successes = process_articles(&client, articles, config, &mut cache).await;
    cache.save(&config.cache_path)?;

    info!(
        "linkbacks run finished in {:.2?}: {} notification(s) sent, {} new cache entr(ies)",
        started.elapsed(),
        successes,
        cache.total_urls() - urls_before,
    );
    Ok(successes)
}

/// Infallible by construction: fetch and notification failures are logged
/// and skipped, never returned.
async fn process_articles(
    client: &Client,
    articles: &[Article],
    config: &Config,
    cache: &mut LinkCache,
) -> usize {
    let mut successes = 0;
    for article in articles.iter().filter(|a| a.is_published()) {
        for link in extract_candidate_links(article, config, cache) {
            let fetched = match fetch(client, config, &link).await {
                Ok(fetched) => fetched,
                Err(err) => {
                    // Left out of the cache so the next run retries it.
                    warn!("Failed to fetch link url {link}: {err}");
                    continue;
                }
            };

            if send_pingback(client, &article.url, &link, &fetched)
                .await
                .is_sent()
            {
                successes += 1;
            }
            if send_webmention(client, &article.url, &link, &fetched)
                .await
                .is_sent()
            {
                successes += 1;
            }

            // Processed once it was fetched, whatever the notifiers said.
            cache.add(&article.slug, &link);
        }
    }
    successes
}
