//! Integration tests for feed runs
//!
//! These tests use wiremock to serve feeds and article pages and run the
//! full resolve, fetch, normalize and store cycle end-to-end.

use unified_rss::config::{default_config, load_config, FetchConfig, SiteConfig};
use unified_rss::fetch::HttpFetcher;
use unified_rss::output::format_site_json;
use unified_rss::sites::SiteRegistry;
use unified_rss::storage::{
    open_storage, ArticleStore, RunStatus, RunStore, SiteConfigStore, SqliteStorage,
};
use unified_rss::{FeedRunner, RunOverrides, UnifiedError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MEDIA_NS: &str = "http://search.yahoo.com/mrss/";

/// Builds an RSS 2.0 feed in the Le Monde dialect whose links point at `base_url`
fn le_monde_feed(base_url: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Le Monde.fr - Actualités et Infos en France et dans le monde</title>
    <item>
      <title><![CDATA[Budget 2025 : le gouvernement présente son projet]]></title>
      <link>{base}/politique/article/budget.html</link>
      <pubDate>Mon, 20 Jan 2025 10:00:00 +0100</pubDate>
      <description><![CDATA[<p>Le projet de loi de finances <b>arrive</b> au Parlement.</p>]]></description>
      <dc:creator>Service politique</dc:creator>
      <category>Politique, Budget ,</category>
      <media:content url="https://img.lemonde.fr/budget.jpg" width="644" height="322"/>
    </item>
    <item>
      <title>Ligue 1 : le PSG s'impose</title>
      <link>{base}/sport/article/psg.html</link>
      <pubDate>Mon, 20 Jan 2025 09:00:00 +0100</pubDate>
      <description>Large victoire au Parc des Princes.</description>
    </item>
  </channel>
</rss>"#,
        base = base_url
    )
}

fn le_monde_site() -> SiteConfig {
    let mut site = SiteConfig::new("Le Monde", "/rss/lemonde");
    site.language = "fr".to_string();
    site.countries = vec!["France".to_string()];
    site.categories = vec!["News".to_string()];
    site.author_field = Some("dc:creator".to_string());
    site.keywords_field = Some("category".to_string());
    site.media_namespace = Some(MEDIA_NS.to_string());
    site.media_content_field = Some("content".to_string());
    site
}

fn test_fetcher() -> HttpFetcher {
    HttpFetcher::new(&FetchConfig {
        timeout_secs: 5,
        user_agent: "unified-rss-test/1.0".to_string(),
    })
    .expect("Failed to build HTTP client")
}

async fn mount_feed(server: &MockServer, feed_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(feed_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/rss+xml"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_feed_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_feed(&mock_server, "/rss/lemonde/une.xml", le_monde_feed(&base_url)).await;

    let sites = SiteRegistry::from(vec![le_monde_site()]);
    let mut storage = SqliteStorage::new_in_memory().expect("Failed to create storage");
    let fetcher = test_fetcher();

    let feed_url = format!("{}/rss/lemonde/une.xml", base_url);
    let report = FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
        .process_feed(&feed_url, None, &RunOverrides::default())
        .await
        .expect("Feed run failed");

    assert_eq!(report.site_name, "Le Monde");
    assert_eq!(report.entries_seen, 2);
    assert_eq!(report.articles_saved, 2);
    assert_eq!(report.articles_failed, 0);

    let budget = storage
        .get_article(&format!("{}/politique/article/budget.html", base_url))
        .expect("Failed to query article")
        .expect("Article not stored");
    assert_eq!(
        budget.title,
        "Budget 2025 : le gouvernement présente son projet"
    );
    assert_eq!(
        budget.description,
        "Le projet de loi de finances arrive au Parlement."
    );
    assert_eq!(budget.date, "Mon, 20 Jan 2025 10:00:00 +0100");
    assert_eq!(budget.author.as_deref(), Some("Service politique"));
    assert_eq!(budget.keywords, vec!["Politique", "Budget"]);
    assert_eq!(budget.image, "https://img.lemonde.fr/budget.jpg");
    assert_eq!(budget.source, "Le Monde");
    assert_eq!(budget.language, "fr");
    assert_eq!(budget.countries, vec!["France"]);
    assert_eq!(budget.categories, vec!["News"]);
    assert!(budget.fetch_timestamp.is_some());

    let psg = storage
        .get_article(&format!("{}/sport/article/psg.html", base_url))
        .expect("Failed to query article")
        .expect("Article not stored");
    assert_eq!(psg.author, None);
    assert!(psg.keywords.is_empty());
    assert_eq!(psg.image, "");

    let runs = storage.latest_runs(1).expect("Failed to query runs");
    assert_eq!(runs[0].status, RunStatus::Completed);
    assert_eq!(runs[0].feed_url, feed_url);
}

#[tokio::test]
async fn test_latin1_feed_keeps_accents() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let feed = format!(
        r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<rss version="2.0"><channel>
  <item>
    <title>Réforme du Sénat</title>
    <link>{base}/politique/senat.html</link>
    <description>&lt;p&gt;Les sénateurs débattent&lt;/p&gt;</description>
  </item>
</channel></rss>"#,
        base = base_url
    );
    let (latin1, _, _) = encoding_rs::WINDOWS_1252.encode(&feed);
    Mock::given(method("GET"))
        .and(path("/rss/lemonde/politique.xml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(latin1.into_owned(), "application/rss+xml"),
        )
        .mount(&mock_server)
        .await;

    let sites = SiteRegistry::from(vec![le_monde_site()]);
    let mut storage = SqliteStorage::new_in_memory().expect("Failed to create storage");
    let fetcher = test_fetcher();

    let report = FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
        .process_feed(
            &format!("{}/rss/lemonde/politique.xml", base_url),
            None,
            &RunOverrides::default(),
        )
        .await
        .expect("Feed run failed");
    assert_eq!(report.articles_saved, 1);

    let article = storage
        .get_article(&format!("{}/politique/senat.html", base_url))
        .expect("Failed to query article")
        .expect("Article not stored");
    assert_eq!(article.title, "Réforme du Sénat");
    assert_eq!(article.description, "Les sénateurs débattent");
}

#[tokio::test]
async fn test_overrides_replace_site_defaults() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_feed(&mock_server, "/rss/lemonde/en.xml", le_monde_feed(&base_url)).await;

    let sites = SiteRegistry::from(vec![le_monde_site()]);
    let mut storage = SqliteStorage::new_in_memory().expect("Failed to create storage");
    let fetcher = test_fetcher();

    let overrides = RunOverrides {
        language: Some("en".to_string()),
        categories: Some(vec!["Economy".to_string()]),
        countries: None,
    };
    FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
        .process_feed(&format!("{}/rss/lemonde/en.xml", base_url), None, &overrides)
        .await
        .expect("Feed run failed");

    let articles = storage.list_articles(None, 10).expect("Failed to list");
    assert_eq!(articles.len(), 2);
    for article in articles {
        assert_eq!(article.language, "en");
        assert_eq!(article.categories, vec!["Economy"]);
        assert_eq!(article.countries, vec!["France"]);
    }
}

#[tokio::test]
async fn test_article_page_image_with_relative_src() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let feed = format!(
        r#"<rss version="2.0"><channel>
  <item>
    <title>Reportage</title>
    <link>{base}/articles/reportage.html</link>
  </item>
</channel></rss>"#,
        base = base_url
    );
    mount_feed(&mock_server, "/rss/echos.xml", feed).await;

    Mock::given(method("GET"))
        .and(path("/articles/reportage.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><body>
                    <img src="/static/logo.png">
                    <figure class="lead"><img src="/pics/a.jpg" alt="Reportage"></figure>
                    </body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut site = SiteConfig::new("Les Echos", "/rss/echos");
    site.fetch_article_image = true;
    site.article_image_selector = Some("figure.lead img".to_string());
    let sites = SiteRegistry::from(vec![site]);

    let mut storage = SqliteStorage::new_in_memory().expect("Failed to create storage");
    let fetcher = test_fetcher();

    FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
        .process_feed(
            &format!("{}/rss/echos.xml", base_url),
            None,
            &RunOverrides::default(),
        )
        .await
        .expect("Feed run failed");

    let article = storage
        .get_article(&format!("{}/articles/reportage.html", base_url))
        .expect("Failed to query article")
        .expect("Article not stored");
    assert_eq!(article.image, format!("{}/pics/a.jpg", base_url));
}

#[tokio::test]
async fn test_article_page_failure_keeps_article() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let feed = format!(
        r#"<rss version="2.0"><channel>
  <item><title>Introuvable</title><link>{base}/articles/gone.html</link></item>
</channel></rss>"#,
        base = base_url
    );
    mount_feed(&mock_server, "/rss/echos.xml", feed).await;

    Mock::given(method("GET"))
        .and(path("/articles/gone.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let mut site = SiteConfig::new("Les Echos", "/rss/echos");
    site.fetch_article_image = true;
    let sites = SiteRegistry::from(vec![site]);

    let mut storage = SqliteStorage::new_in_memory().expect("Failed to create storage");
    let fetcher = test_fetcher();

    let report = FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
        .process_feed(
            &format!("{}/rss/echos.xml", base_url),
            None,
            &RunOverrides::default(),
        )
        .await
        .expect("Feed run failed");

    assert_eq!(report.articles_saved, 1);
    let article = storage
        .get_article(&format!("{}/articles/gone.html", base_url))
        .expect("Failed to query article")
        .expect("Article not stored");
    assert_eq!(article.image, "");
}

#[tokio::test]
async fn test_rerun_is_idempotent_by_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_feed(&mock_server, "/rss/lemonde/une.xml", le_monde_feed(&base_url)).await;

    let sites = SiteRegistry::from(vec![le_monde_site()]);
    let mut storage = SqliteStorage::new_in_memory().expect("Failed to create storage");
    let fetcher = test_fetcher();
    let feed_url = format!("{}/rss/lemonde/une.xml", base_url);

    for _ in 0..2 {
        FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
            .process_feed(&feed_url, None, &RunOverrides::default())
            .await
            .expect("Feed run failed");
    }

    assert_eq!(storage.count_articles().expect("Failed to count"), 2);
    assert_eq!(storage.latest_runs(10).expect("Failed to list runs").len(), 2);
}

#[tokio::test]
async fn test_atom_feed_with_default_namespace() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let feed = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Blog</title>
  <entry>
    <title>Release notes</title>
    <link rel="alternate" href="{base}/posts/release.html"/>
    <updated>2025-01-20T10:00:00Z</updated>
    <summary>What changed this week.</summary>
    <author><name>Jeanne</name></author>
  </entry>
</feed>"#,
        base = base_url
    );
    mount_feed(&mock_server, "/atom/blog.xml", feed).await;

    let mut site = SiteConfig::new("Blog", "/atom/blog");
    site.link_field = "link|href".to_string();
    site.date_field = "updated".to_string();
    site.description_field = "summary".to_string();
    site.author_field = Some("author/name".to_string());
    let sites = SiteRegistry::from(vec![site]);

    let mut storage = SqliteStorage::new_in_memory().expect("Failed to create storage");
    let fetcher = test_fetcher();

    FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
        .process_feed(
            &format!("{}/atom/blog.xml", base_url),
            None,
            &RunOverrides::default(),
        )
        .await
        .expect("Feed run failed");

    let article = storage
        .get_article(&format!("{}/posts/release.html", base_url))
        .expect("Failed to query article")
        .expect("Article not stored");
    assert_eq!(article.title, "Release notes");
    assert_eq!(article.date, "2025-01-20T10:00:00Z");
    assert_eq!(article.description, "What changed this week.");
    assert_eq!(article.author.as_deref(), Some("Jeanne"));
}

#[tokio::test]
async fn test_site_not_found_makes_no_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let sites = SiteRegistry::from(vec![le_monde_site()]);
    let mut storage = SqliteStorage::new_in_memory().expect("Failed to create storage");
    let fetcher = test_fetcher();

    let result = FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
        .process_feed(
            &format!("{}/rss/figaro.xml", mock_server.uri()),
            None,
            &RunOverrides::default(),
        )
        .await;

    assert!(matches!(result, Err(UnifiedError::SiteNotFound(_))));
    assert!(storage.latest_runs(10).expect("Failed to list runs").is_empty());
}

#[tokio::test]
async fn test_feed_server_error_fails_run() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss/lemonde/une.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let sites = SiteRegistry::from(vec![le_monde_site()]);
    let mut storage = SqliteStorage::new_in_memory().expect("Failed to create storage");
    let fetcher = test_fetcher();

    let result = FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
        .process_feed(
            &format!("{}/rss/lemonde/une.xml", mock_server.uri()),
            None,
            &RunOverrides::default(),
        )
        .await;

    assert!(matches!(result, Err(UnifiedError::Fetch(_))));
    let runs = storage.latest_runs(1).expect("Failed to list runs");
    assert_eq!(runs[0].status, RunStatus::Failed);
    assert_eq!(storage.count_articles().expect("Failed to count"), 0);
}

#[tokio::test]
async fn test_malformed_feed_fails_run() {
    let mock_server = MockServer::start().await;
    mount_feed(
        &mock_server,
        "/rss/lemonde/une.xml",
        "<html><body>Service indisponible".to_string(),
    )
    .await;

    let sites = SiteRegistry::from(vec![le_monde_site()]);
    let mut storage = SqliteStorage::new_in_memory().expect("Failed to create storage");
    let fetcher = test_fetcher();

    let result = FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
        .process_feed(
            &format!("{}/rss/lemonde/une.xml", mock_server.uri()),
            None,
            &RunOverrides::default(),
        )
        .await;

    assert!(matches!(result, Err(UnifiedError::FeedParse { .. })));
    let runs = storage.latest_runs(1).expect("Failed to list runs");
    assert_eq!(runs[0].status, RunStatus::Failed);
}

#[tokio::test]
async fn test_sites_seeded_from_config_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_feed(&mock_server, "/rss/lemonde/une.xml", le_monde_feed(&base_url)).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("sites.toml");
    let db_path = temp_dir.path().join("db").join("site_configs.db");
    std::fs::write(
        &config_path,
        r#"
[fetch]
timeout-secs = 5

[[site]]
site-name = "Le Monde"
url-pattern = "/rss/lemonde"
language = "fr"
countries = ["France"]
author-field = "dc:creator"
media-namespace = "http://search.yahoo.com/mrss/"
media-content-field = "content"
"#,
    )
    .expect("Failed to write config");

    let config = load_config(&config_path).expect("Failed to load config");

    // Seed the database, then resolve from what was stored
    let mut storage = open_storage(&db_path).expect("Failed to open storage");
    for site in &config.sites {
        storage.upsert_site(site).expect("Failed to store site");
    }
    let sites = SiteRegistry::from(storage.list_sites().expect("Failed to list sites"));
    assert_eq!(sites.len(), 1);

    let fetcher = HttpFetcher::new(&config.fetch).expect("Failed to build HTTP client");
    let report = FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
        .process_feed(
            &format!("{}/rss/lemonde/une.xml", base_url),
            Some("Le Monde"),
            &RunOverrides::default(),
        )
        .await
        .expect("Feed run failed");

    assert_eq!(report.articles_saved, 2);
    assert!(db_path.exists());

    let articles = storage
        .list_articles(Some("Le Monde"), 10)
        .expect("Failed to list articles");
    assert_eq!(articles.len(), 2);
    assert!(articles
        .iter()
        .any(|a| a.author.as_deref() == Some("Service politique")));
}

#[tokio::test]
async fn test_built_in_sites_seed_and_export() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_feed(&mock_server, "/rss/une.xml", le_monde_feed(&base_url)).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("site_configs.db");

    let config = default_config().expect("Built-in sites should parse");
    let mut storage = open_storage(&db_path).expect("Failed to open storage");
    for site in &config.sites {
        storage.upsert_site(site).expect("Failed to store site");
    }

    let stored = storage.list_sites().expect("Failed to list sites");
    let names: Vec<&str> = stored.iter().map(|s| s.site_name.as_str()).collect();
    assert_eq!(names, vec!["Le Monde", "L'Équipe", "Les Echos", "Le Figaro"]);

    let equipe = storage
        .find_by_name("L'Équipe")
        .expect("Failed to look up site")
        .expect("L'Équipe should be stored");
    let json = format_site_json(&equipe).expect("Failed to export site");
    assert!(json.contains(r#""site-name": "L'Équipe""#));
    assert!(json.contains(r#""fetch-article-image": true"#));

    let sites = SiteRegistry::from(stored);
    let fetcher = test_fetcher();
    let report = FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher)
        .process_feed(
            &format!("{}/rss/une.xml", base_url),
            Some("Le Monde"),
            &RunOverrides::default(),
        )
        .await
        .expect("Feed run failed");
    assert_eq!(report.articles_saved, 2);

    let articles = storage
        .list_articles(Some("Le Monde"), 10)
        .expect("Failed to list articles");
    let budget = articles
        .iter()
        .find(|a| a.link.ends_with("/budget.html"))
        .expect("Budget article should be stored");
    assert_eq!(budget.image, "https://img.lemonde.fr/budget.jpg");
    assert_eq!(budget.countries, vec!["France"]);
    assert_eq!(budget.language, "fr");
}
