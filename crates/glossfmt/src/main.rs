use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use gloss_format::{EntryFormatter, FormatOptions, OptionsError, Vocabulary, parse_bool};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use glossfmt::rate_limit::{DEFAULT_CLIENT_HEADER, RateLimiterLayer};
use glossfmt::{AppState, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_MAX_BATCH_SIZE: usize = 500;
const DEFAULT_RATE_LIMIT_RPS: u32 = 5;
const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    info!(
        "vocabulary: {} tags, line break {:?}, tag class {:?}",
        config.vocabulary.tags().len(),
        config.options.line_break,
        config.options.tag_class
    );
    if !config.options.borrow_empty_text {
        info!("empty sense borrowing disabled");
    }
    if config.disable_cache {
        info!("cache headers disabled");
    }
    info!(
        "rate limit: {} req/s (burst {}) keyed by {}",
        config.rate_limit_rps, config.rate_limit_burst, config.client_header
    );

    let state = AppState {
        formatter: Arc::new(EntryFormatter::new(config.vocabulary, config.options)),
        max_batch_size: config.max_batch_size,
        disable_cache: config.disable_cache,
    };

    let rate_limiter = RateLimiterLayer::new(config.rate_limit_rps, config.rate_limit_burst)
        .with_client_header(&config.client_header);
    let app = router(state)
        .layer(rate_limiter)
        .layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    vocabulary: Arc<Vocabulary>,
    options: FormatOptions,
    max_batch_size: usize,
    disable_cache: bool,
    rate_limit_rps: u32,
    rate_limit_burst: u32,
    client_header: String,
}

fn load_config() -> Config {
    let mut disable_cache = false;
    let mut no_borrow = false;
    let mut cli_line_break: Option<String> = None;
    let mut cli_tag_class: Option<String> = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--no-cache" => disable_cache = true,
            "--no-borrow" => no_borrow = true,
            _ => {
                if let Some(marker) = arg.strip_prefix("--line-break=") {
                    cli_line_break = Some(marker.to_string());
                } else if let Some(class) = arg.strip_prefix("--tag-class=") {
                    cli_tag_class = Some(class.to_string());
                } else {
                    warn!("ignoring unknown argument {arg:?}");
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let vocabulary = match env::var("GLOSS_TAGS") {
        Ok(raw) => Vocabulary::parse_list(&raw).map(Arc::new).unwrap_or_else(|err| {
            warn!("GLOSS_TAGS rejected, using full vocabulary: {err}");
            Vocabulary::standard()
        }),
        Err(_) => Vocabulary::standard(),
    };

    let mut options = FormatOptions::default();
    if let Some(marker) = cli_line_break.or_else(|| env::var("GLOSS_LINE_BREAK").ok()) {
        options = apply(options, "line break", |o| o.with_line_break(&marker));
    }
    if let Some(class) = cli_tag_class.or_else(|| env::var("GLOSS_TAG_CLASS").ok()) {
        options = apply(options, "tag class", |o| o.with_tag_class(&class));
    }
    if let Ok(raw) = env::var("GLOSS_CONNECTORS") {
        options = apply(options, "connectors", |o| o.with_connectors(&raw));
    }
    let borrow = if no_borrow {
        false
    } else {
        env::var("GLOSS_BORROW_EMPTY_TEXT")
            .ok()
            .and_then(|raw| {
                parse_bool(&raw)
                    .inspect_err(|err| warn!("GLOSS_BORROW_EMPTY_TEXT rejected: {err}"))
                    .ok()
            })
            .unwrap_or(true)
    };
    options = options.with_borrow_empty_text(borrow);

    let max_batch_size = env::var("MAX_BATCH_SIZE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_MAX_BATCH_SIZE);
    let rate_limit_rps = env::var("RATE_LIMIT_RPS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RATE_LIMIT_RPS);
    let rate_limit_burst = env::var("RATE_LIMIT_BURST")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RATE_LIMIT_BURST);
    let client_header = env::var("RATE_LIMIT_CLIENT_HEADER")
        .unwrap_or_else(|_| DEFAULT_CLIENT_HEADER.to_string());

    Config {
        host,
        port,
        vocabulary,
        options,
        max_batch_size,
        disable_cache,
        rate_limit_rps,
        rate_limit_burst,
        client_header,
    }
}

/// Apply a fallible option update, keeping the previous value on error.
fn apply<F>(options: FormatOptions, what: &str, update: F) -> FormatOptions
where
    F: FnOnce(FormatOptions) -> Result<FormatOptions, OptionsError>,
{
    match update(options.clone()) {
        Ok(updated) => updated,
        Err(err) => {
            warn!("{what} rejected, keeping default: {err}");
            options
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
