use linkherald::{Article, ArticleStatus, Config, LinkCache, runner};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn article_linking_to(target: &str) -> Article {
    Article {
        slug: "my-article".to_string(),
        status: ArticleStatus::Published,
        content: format!(r#"<p>Worth reading: <a href="{target}">this page</a>.</p>"#),
        url: "http://blog.example.com/my-article.html".to_string(),
    }
}

fn config_with_cache(dir: &tempfile::TempDir) -> Config {
    Config {
        cache_path: dir.path().join("linkbacks.json"),
        ..Config::default()
    }
}

async fn mount_target_page(server: &MockServer, pingback: bool, webmention: bool) {
    let mut template = ResponseTemplate::new(200)
        .set_body_string("<html><body>Dummy linked content</body></html>")
        .insert_header("Content-Type", "text/html");
    if pingback {
        template = template.insert_header(
            "X-Pingback",
            format!("{}/pingback-endpoint", server.uri()).as_str(),
        );
    }
    if webmention {
        template = template.insert_header(
            "Link",
            format!("<{}/webmention-endpoint>; rel=\"webmention\"", server.uri()).as_str(),
        );
    }
    Mock::given(method("GET"))
        .and(path("/some-page.html"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn webmention_success_counts_one_and_rerun_counts_zero() {
    init_tracing();
    let server = MockServer::start().await;
    mount_target_page(&server, false, true).await;
    Mock::given(method("POST"))
        .and(path("/webmention-endpoint"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_with_cache(&dir);
    let target = format!("{}/some-page.html", server.uri());
    let articles = vec![article_linking_to(&target)];

    assert_eq!(runner::run(&articles, &config).await.unwrap(), 1);
    // Second run skips the cached link: no new fetch, no new POST.
    assert_eq!(runner::run(&articles, &config).await.unwrap(), 0);

    let cache = LinkCache::load(&config.cache_path).unwrap();
    assert!(cache.contains("my-article", &target));
}

#[tokio::test]
async fn both_protocols_count_two_for_one_link() {
    init_tracing();
    let server = MockServer::start().await;
    mount_target_page(&server, true, true).await;
    Mock::given(method("POST"))
        .and(path("/pingback-endpoint"))
        .and(body_string_contains("pingback.ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<methodResponse><params>
                <param><value><string>Pingback registered.</string></value></param>
            </params></methodResponse>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webmention-endpoint"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_with_cache(&dir);
    let target = format!("{}/some-page.html", server.uri());
    let articles = vec![article_linking_to(&target)];

    assert_eq!(runner::run(&articles, &config).await.unwrap(), 2);
}

#[tokio::test]
async fn unreachable_target_is_not_cached_and_counts_zero() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_cache(&dir);
    // Connection refused; nothing listens on port 1.
    let target = "http://127.0.0.1:1/some-page.html";
    let articles = vec![article_linking_to(target)];

    assert_eq!(runner::run(&articles, &config).await.unwrap(), 0);

    // Eligible for retry next run: the failed fetch left no cache entry.
    let cache = LinkCache::load(&config.cache_path).unwrap();
    assert!(!cache.contains("my-article", target));
}

#[tokio::test]
async fn pingback_already_registered_counts_zero_but_caches_the_link() {
    init_tracing();
    let server = MockServer::start().await;
    mount_target_page(&server, true, false).await;
    Mock::given(method("POST"))
        .and(path("/pingback-endpoint"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<methodResponse><fault><value><struct>
                <member><name>faultCode</name><value><int>48</int></value></member>
                <member><name>faultString</name>
                    <value><string>The pingback has already been registered.</string></value></member>
            </struct></value></fault></methodResponse>"#,
        ))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_with_cache(&dir);
    let target = format!("{}/some-page.html", server.uri());
    let articles = vec![article_linking_to(&target)];

    assert_eq!(runner::run(&articles, &config).await.unwrap(), 0);
    let cache = LinkCache::load(&config.cache_path).unwrap();
    assert!(cache.contains("my-article", &target));
}

#[tokio::test]
async fn internal_links_are_never_fetched() {
    init_tracing();
    let server = MockServer::start().await;
    // Any GET against the server would violate this zero-call expectation.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        site_url: server.uri(),
        cache_path: dir.path().join("linkbacks.json"),
        ..Config::default()
    };
    let target = format!("{}/some-page.html", server.uri());
    let articles = vec![article_linking_to(&target)];

    assert_eq!(runner::run(&articles, &config).await.unwrap(), 0);
}

#[tokio::test]
async fn unpublished_articles_are_skipped() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_with_cache(&dir);
    let target = format!("{}/some-page.html", server.uri());
    let mut draft = article_linking_to(&target);
    draft.status = ArticleStatus::Draft;

    assert_eq!(runner::run(&[draft], &config).await.unwrap(), 0);
}

#[tokio::test]
async fn cache_file_is_unchanged_by_an_idempotent_rerun() {
    init_tracing();
    let server = MockServer::start().await;
    mount_target_page(&server, false, true).await;
    Mock::given(method("POST"))
        .and(path("/webmention-endpoint"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_with_cache(&dir);
    let target = format!("{}/some-page.html", server.uri());
    let articles = vec![article_linking_to(&target)];

    runner::run(&articles, &config).await.unwrap();
    let first = LinkCache::load(&config.cache_path).unwrap();
    runner::run(&articles, &config).await.unwrap();
    let second = LinkCache::load(&config.cache_path).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn target_without_any_endpoint_still_gets_cached() {
    init_tracing();
    let server = MockServer::start().await;
    mount_target_page(&server, false, false).await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_with_cache(&dir);
    let target = format!("{}/some-page.html", server.uri());
    let articles = vec![article_linking_to(&target)];

    assert_eq!(runner::run(&articles, &config).await.unwrap(), 0);
    let cache = LinkCache::load(&config.cache_path).unwrap();
    assert!(cache.contains("my-article", &target));
}
