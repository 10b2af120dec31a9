//! linkherald: linkback notifications for static-site builds.
//!
//! Given the articles produced by a site build, this crate notifies the
//! pages they link to over both linkback protocols: Pingback (XML-RPC) and
//! WebMention (HTTP form POST). Each external link is fetched once, both
//! protocols are attempted against that single response, and a per-article
//! JSON cache makes re-runs incremental.
//!
//! The host build pipeline calls [`runner::run`] once per build:
//!
//! ```no_run
//! use linkherald::{Article, ArticleStatus, Config, runner};
//!
//! # async fn build_hook() -> Result<(), linkherald::runner::RunError> {
//! let articles = vec![Article {
//!     slug: "hello-world".to_string(),
//!     status: ArticleStatus::Published,
//!     content: r#"<p><a href="http://example.net/post.html">a post</a></p>"#.to_string(),
//!     url: "https://blog.example.com/hello-world.html".to_string(),
//! }];
//! let sent = runner::run(&articles, &Config::for_site("https://blog.example.com/")).await?;
//! println!("{sent} notification(s) sent");
//! # Ok(())
//! # }
//! ```

pub mod article;
pub mod cache;
pub mod config;
pub mod discovery;
pub mod fetcher;
pub mod notifier;
pub mod runner;

pub use article::{Article, ArticleStatus};
pub use cache::LinkCache;
pub use config::Config;
pub use fetcher::{FetchError, FetchResult};
pub use notifier::Outcome;
