//! Unified-RSS main entry point
//!
//! This is the command-line interface for the Unified-RSS feed normalizer.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use unified_rss::config::{default_config, load_config, validate_site, Config, SiteConfig};
use unified_rss::fetch::HttpFetcher;
use unified_rss::output::{
    format_site_json, print_articles, print_run_report, print_runs, print_sites,
};
use unified_rss::sites::SiteRegistry;
use unified_rss::storage::{open_storage, ArticleStore, RunStore, SiteConfigStore};
use unified_rss::{FeedRunner, RunOverrides, UnifiedError};

/// Log files kept by the daily rotation: today's plus seven backups
const LOG_FILES_KEPT: usize = 8;

/// Unified-RSS: configuration-driven feed normalization
///
/// Unified-RSS fetches RSS/Atom feeds from news sites and turns every entry
/// into a common article record, using a declarative per-site configuration
/// that says where each field lives in that site's feed.
#[derive(Parser, Debug)]
#[command(name = "unified-rss")]
#[command(version = "1.0.0")]
#[command(about = "Configuration-driven RSS normalizer", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Path to the SQLite database (overrides the config file)
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<PathBuf>,

    /// Directory for the daily rotating log file
    #[arg(long, value_name = "DIR", default_value = "log", global = true)]
    log_dir: PathBuf,

    /// Log to the console only
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape one feed and store its articles
    Scrape {
        /// URL of the RSS/Atom feed
        #[arg(value_name = "RSS_URL")]
        url: String,

        /// Site name to use instead of matching the feed URL
        #[arg(long)]
        site: Option<String>,

        /// Language override, e.g. "en"
        #[arg(long)]
        language: Option<String>,

        /// Categories override as a JSON array, e.g. '["Economy"]'
        #[arg(long, value_name = "JSON")]
        categories: Option<String>,

        /// Countries override as a JSON array, e.g. '["France"]'
        #[arg(long, value_name = "JSON")]
        countries: Option<String>,

        /// Resolve sites and fetch settings from this TOML file instead of the database
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Store site configurations from a TOML file, or the built-in sites
    Setup {
        /// Path to TOML configuration file; the bundled sites when omitted
        #[arg(value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Add or replace one site configuration
    Add(AddSite),

    /// Print one stored site configuration as JSON
    Export {
        /// Name of the site to export
        #[arg(value_name = "SITE")]
        site: String,
    },

    /// List stored site configurations
    Sites,

    /// List recently fetched articles
    Articles {
        /// Only list articles from this site
        #[arg(long)]
        source: Option<String>,

        /// Maximum number of articles to list
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// List recent feed runs
    Runs {
        /// Maximum number of runs to list
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

/// Site fields accepted by the `add` command
#[derive(Args, Debug)]
struct AddSite {
    /// Site name, also the article source
    #[arg(long)]
    name: String,

    /// Substring of the site's feed URLs
    #[arg(long)]
    url_pattern: String,

    /// Default article language
    #[arg(long, default_value = "fr")]
    language: String,

    /// Default categories as a JSON array
    #[arg(long, value_name = "JSON")]
    categories: Option<String>,

    /// Default countries as a JSON array
    #[arg(long, value_name = "JSON")]
    countries: Option<String>,

    /// Field path of the author, e.g. "dc:creator"
    #[arg(long)]
    author_field: Option<String>,

    /// Field path of the comma-separated keywords
    #[arg(long)]
    keywords_field: Option<String>,

    /// Field path of the image URL, e.g. "enclosure|url"
    #[arg(long)]
    image_field: Option<String>,

    /// Namespace URI of the media enclosure element
    #[arg(long)]
    media_namespace: Option<String>,

    /// Local name of the media enclosure element
    #[arg(long)]
    media_content_field: Option<String>,

    /// Fetch the article page to find an image
    #[arg(long)]
    fetch_article_image: bool,

    /// CSS selector for the article page image
    #[arg(long)]
    article_image_selector: Option<String>,
}

impl AddSite {
    /// Builds and validates the site configuration
    fn into_site_config(self) -> Result<SiteConfig, Box<dyn std::error::Error>> {
        let mut site = SiteConfig::new(self.name, self.url_pattern);
        site.language = self.language;
        site.categories = parse_json_list("categories", self.categories.as_deref())?
            .unwrap_or_default();
        site.countries = parse_json_list("countries", self.countries.as_deref())?
            .unwrap_or_default();
        site.author_field = self.author_field;
        site.keywords_field = self.keywords_field;
        site.image_field = self.image_field;
        site.media_namespace = self.media_namespace;
        site.media_content_field = self.media_content_field;
        site.fetch_article_image = self.fetch_article_image;
        site.article_image_selector = self.article_image_selector;

        validate_site(&site)?;
        Ok(site)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_dir = (!cli.no_log_file).then_some(cli.log_dir.as_path());
    setup_logging(cli.verbose, cli.quiet, log_dir);

    match cli.command {
        Command::Scrape {
            url,
            site,
            language,
            categories,
            countries,
            config,
        } => {
            let overrides = RunOverrides {
                language,
                categories: parse_json_list("categories", categories.as_deref())?,
                countries: parse_json_list("countries", countries.as_deref())?,
            };
            handle_scrape(
                &url,
                site.as_deref(),
                &overrides,
                config.as_deref(),
                cli.db.as_deref(),
            )
            .await?;
        }
        Command::Setup { config } => handle_setup(config.as_deref(), cli.db.as_deref())?,
        Command::Add(args) => handle_add(args, cli.db.as_deref())?,
        Command::Export { site } => handle_export(&site, cli.db.as_deref())?,
        Command::Sites => handle_sites(cli.db.as_deref())?,
        Command::Articles { source, limit } => {
            handle_articles(source.as_deref(), limit, cli.db.as_deref())?
        }
        Command::Runs { limit } => handle_runs(limit, cli.db.as_deref())?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to the console and, when `log_dir` is given, to a daily rotating
/// file in that directory.
fn setup_logging(verbose: u8, quiet: bool, log_dir: Option<&Path>) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("unified_rss=info,warn"),
            1 => EnvFilter::new("unified_rss=debug,info"),
            2 => EnvFilter::new("unified_rss=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let (file_layer, file_error) = match log_dir.map(build_log_file) {
        Some(Ok(appender)) => (
            Some(fmt::layer().with_writer(appender).with_ansi(false)),
            None,
        ),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("Logging to console only: {}", e);
    }
}

/// Opens the daily rotating log file in `dir`, creating the directory
fn build_log_file(dir: &Path) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("unified-rss")
        .filename_suffix("log")
        .max_log_files(LOG_FILES_KEPT)
        .build(dir)?;

    Ok(appender)
}

/// Parses an optional JSON string array given on the command line
fn parse_json_list(
    name: &str,
    raw: Option<&str>,
) -> Result<Option<Vec<String>>, Box<dyn std::error::Error>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => Ok(Some(list)),
        Err(e) => {
            tracing::error!("Invalid JSON array for --{}: {}", name, e);
            Err(e.into())
        }
    }
}

/// Picks the database path: `--db`, else the config's, else the default
fn database_path(db: Option<&Path>, config: &Config) -> PathBuf {
    db.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.output.database_path))
}

/// Loads and validates a configuration file, logging failures
fn load_config_logged(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    tracing::info!("Loading configuration from: {}", path.display());
    match load_config(path) {
        Ok(config) => {
            tracing::info!(
                "Configuration loaded successfully ({} sites)",
                config.sites.len()
            );
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the scrape command: runs one feed and stores its articles
async fn handle_scrape(
    url: &str,
    site: Option<&str>,
    overrides: &RunOverrides,
    config_path: Option<&Path>,
    db: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => load_config_logged(path)?,
        None => Config::default(),
    };

    let mut storage = open_storage(&database_path(db, &config))?;

    let sites = match config_path {
        Some(_) => SiteRegistry::from_config(&config),
        None => SiteRegistry::from(storage.list_sites()?),
    };
    tracing::debug!("Resolving against {} site configurations", sites.len());

    let fetcher = HttpFetcher::new(&config.fetch)?;

    let mut runner = FeedRunner::new(&sites, &mut storage, &fetcher, &fetcher);
    match runner.process_feed(url, site, overrides).await {
        Ok(report) => {
            print_run_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Feed run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the setup command: seeds site configurations into the database
fn handle_setup(
    config_path: Option<&Path>,
    db: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => load_config_logged(path)?,
        None => {
            tracing::info!("Using the built-in site configurations");
            default_config()?
        }
    };
    let path = database_path(db, &config);
    let mut storage = open_storage(&path)?;

    for site in &config.sites {
        storage.upsert_site(site)?;
        tracing::debug!("Stored site configuration '{}'", site.site_name);
    }

    println!(
        "✓ Stored {} site configurations in {}",
        config.sites.len(),
        path.display()
    );

    Ok(())
}

/// Handles the add command: stores one site configuration given as flags
fn handle_add(args: AddSite, db: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let site = match args.into_site_config() {
        Ok(site) => site,
        Err(e) => {
            tracing::error!("Invalid site configuration: {}", e);
            return Err(e);
        }
    };

    let mut storage = open_storage(&database_path(db, &Config::default()))?;
    let existed = storage.find_by_name(&site.site_name)?.is_some();
    storage.upsert_site(&site)?;

    if existed {
        println!("✓ Updated configuration for {}", site.site_name);
    } else {
        println!("✓ Added configuration for {}", site.site_name);
    }

    Ok(())
}

/// Handles the export command: prints one site configuration as JSON
fn handle_export(name: &str, db: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let storage = open_storage(&database_path(db, &Config::default()))?;

    match storage.find_by_name(name)? {
        Some(site) => {
            println!("{}", format_site_json(&site)?);
            Ok(())
        }
        None => {
            tracing::error!("Site '{}' not found", name);
            Err(UnifiedError::SiteNotFound(name.to_string()).into())
        }
    }
}

/// Handles the sites command: lists stored site configurations
fn handle_sites(db: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let storage = open_storage(&database_path(db, &Config::default()))?;
    print_sites(&storage.list_sites()?);
    Ok(())
}

/// Handles the articles command: lists recently fetched articles
fn handle_articles(
    source: Option<&str>,
    limit: usize,
    db: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage = open_storage(&database_path(db, &Config::default()))?;
    print_articles(&storage.list_articles(source, limit)?);
    Ok(())
}

/// Handles the runs command: lists recent feed runs
fn handle_runs(limit: usize, db: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let storage = open_storage(&database_path(db, &Config::default()))?;
    print_runs(&storage.latest_runs(limit)?);
    Ok(())
}
