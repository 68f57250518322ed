use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use chapter_search::catalog::{CatalogLoader, CatalogSource};
use chapter_search::config::Config;
use chapter_search::ingest::{run_ingest, YouTubeClient};
use chapter_search::render::render_results;
use chapter_search::search::QueryFilter;

fn cli() -> Command {
    Command::new("chapter-search")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TigreRoll")
        .about("Search timestamped video chapters")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("search")
                .about("Filter the catalog's chapters by a query")
                .arg(Arg::new("query").value_name("QUERY").required(true))
                .arg(
                    Arg::new("catalog")
                        .long("catalog")
                        .value_name("SRC")
                        .help("Catalog file path or URL"),
                )
                .arg(
                    Arg::new("threshold")
                        .short('t')
                        .long("threshold")
                        .value_name("F")
                        .help("Fuzzy match threshold between 0 and 1")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print results as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("ingest")
                .about("Fetch channel videos and write the catalog file")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .help("Catalog output path"),
                )
                .arg(
                    Arg::new("channel-id")
                        .long("channel-id")
                        .value_name("ID")
                        .help("Channel to ingest"),
                )
                .arg(
                    Arg::new("published-after")
                        .long("published-after")
                        .value_name("TIMESTAMP")
                        .help("Only list videos published after this RFC 3339 time"),
                ),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the built UI")
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Listening port")
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(
                    Arg::new("static-dir")
                        .long("static-dir")
                        .value_name("DIR")
                        .help("Directory with the built UI"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    let loaded = match matches.get_one::<String>("config") {
        Some(path) => Some(Config::load_from(&PathBuf::from(path))?),
        None => Config::load()
            .map_err(|e| warn!("Failed to load config, using defaults: {}", e))
            .ok(),
    };

    let config = match loaded {
        Some(mut config) => {
            config.apply_env();
            config
        }
        None => Config::from_env()?,
    };

    debug!("{}", config.summary());
    Ok(config)
}

async fn search(mut config: Config, matches: &ArgMatches) -> Result<()> {
    if let Some(source) = matches.get_one::<String>("catalog") {
        config.catalog.source = source.clone();
    }
    if let Some(threshold) = matches.get_one::<f64>("threshold") {
        config.search.fuzzy_threshold = *threshold;
    }
    config.validate_search()?;

    let query = matches
        .get_one::<String>("query")
        .ok_or_else(|| anyhow!("a query is required"))?;

    let source = CatalogSource::resolve(&config.catalog.source, config.catalog.site_root.as_deref())?;
    let loader = CatalogLoader::new(
        config.catalog.video_link_prefix.clone(),
        config.catalog.request_timeout_seconds,
    );
    let catalog = loader.load_or_empty(&source).await;

    let results = QueryFilter::with_threshold(config.search.fuzzy_threshold).filter(&catalog, query);
    info!("🔍 {} of {} videos match {:?}", results.len(), catalog.len(), query);

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", render_results(&results));
    }
    Ok(())
}

async fn ingest(mut config: Config, matches: &ArgMatches) -> Result<()> {
    if let Some(output) = matches.get_one::<String>("output") {
        config.ingest.output_path = PathBuf::from(output);
    }
    if let Some(channel_id) = matches.get_one::<String>("channel-id") {
        config.ingest.channel_id = channel_id.clone();
    }
    if let Some(published_after) = matches.get_one::<String>("published-after") {
        config.ingest.published_after = published_after.clone();
    }
    config.validate_ingest()?;

    info!("📺 Ingesting channel {}", config.ingest.channel_id);
    let client = YouTubeClient::new(&config.ingest)?;
    let report = run_ingest(&client, &config.ingest.output_path).await?;

    info!("✅ Written: {}", report.written);
    info!("❌ Skipped: {}", report.skipped);
    Ok(())
}

#[cfg(feature = "api")]
async fn serve(mut config: Config, matches: &ArgMatches) -> Result<()> {
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    if let Some(dir) = matches.get_one::<String>("static-dir") {
        config.server.static_dir = PathBuf::from(dir);
    }
    config.validate_server()?;

    chapter_search::api::serve(&config.server).await
}

#[cfg(not(feature = "api"))]
async fn serve(_config: Config, _matches: &ArgMatches) -> Result<()> {
    Err(anyhow!("built without the `api` feature"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    // Initialize logging
    let default_filter = if matches.get_flag("verbose") {
        "chapter_search=debug,info"
    } else {
        "chapter_search=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("search", sub)) => search(config, sub).await,
        Some(("ingest", sub)) => ingest(config, sub).await,
        Some(("serve", sub)) => serve(config, sub).await,
        _ => Err(anyhow!("unknown command")),
    }
}
