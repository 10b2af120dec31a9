//! Articles as supplied by the site generator, and extraction of the
//! outbound links eligible for linkback notification.

use crate::cache::LinkCache;
use crate::config::Config;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// File extensions that never host a linkback endpoint (media and PDFs).
const BLOCKED_EXTENSIONS: [&str; 6] = [".gif", ".jpg", ".jpeg", ".png", ".bmp", ".pdf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleStatus {
    Published,
    Draft,
    Hidden,
}

/// One generated article. Owned by the site-generation pipeline; this crate
/// only reads it.
#[derive(Debug, Clone)]
pub struct Article {
    /// Unique per run; keys the link cache.
    pub slug: String,
    pub status: ArticleStatus,
    /// Rendered HTML content.
    pub content: String,
    /// Canonical URL of the article, sent as the linkback source.
    pub url: String,
}

impl Article {
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }
}

/// Extracts the article's anchor hrefs in document order, dropping links
/// that cannot or should not receive a notification. Each exclusion is
/// logged with its reason. Recomputed fresh on every call.
pub fn extract_candidate_links(
    article: &Article,
    config: &Config,
    cache: &LinkCache,
) -> Vec<String> {
    let document = Html::parse_document(&article.content);
    let mut links = Vec::new();
    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if is_candidate(href, &article.slug, config, cache) {
            links.push(href.to_string());
        }
    }
    links
}

fn is_candidate(link: &str, slug: &str, config: &Config, cache: &LinkCache) -> bool {
    if !link.starts_with("http://") && !link.starts_with("https://") {
        debug!("Link url {link} skipped because it is not an absolute HTTP(S) URL");
        return false;
    }
    if !config.site_url.is_empty() && link.starts_with(&config.site_url) {
        debug!(
            "Link url {link} skipped because it starts with {}",
            config.site_url
        );
        return false;
    }
    if has_blocked_extension(link) {
        debug!("Link url {link} skipped because it points at a non-HTML file");
        return false;
    }
    if cache.contains(slug, link) {
        debug!("Link url {link} skipped because it has already been processed (present in cache)");
        return false;
    }
    true
}

fn has_blocked_extension(link: &str) -> bool {
    // Judge the extension on the URL path so query strings don't hide it.
    let path = match Url::parse(link) {
        Ok(url) => url.path().to_lowercase(),
        Err(_) => link.to_lowercase(),
    };
    BLOCKED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
