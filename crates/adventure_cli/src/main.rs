//! `adventure` command line tool.
//!
//! # Responsibility
//! - Expose decode/encode/browse over `adventure_core` for local inspection.
//! - Import JSON catalog fixtures into a SQLite catalog.
//!
//! All command output is JSON on stdout except `encode`, which prints the URL.

mod seed;

use adventure_core::{
    build_predicates, decode_url, default_log_level, encode, init_from_config, init_logging,
    init_stderr_logging, load_config, logging_status, open_db, AppConfig, CatalogService,
    FilterState, SqliteAdventureRepository, SqliteTaxonomyRepository, Taxonomy,
    TaxonomyRepository,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "adventure: catalog filter URL inspector",
    long_about = None
)]
struct Cli {
    /// Write rolling log files to this absolute directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error). Logs go to stderr unless
    /// `--log-dir` is set.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Decode a catalog URL into filter state",
        after_help = "EXAMPLES:\n    adventure decode '/hiking/italy?duration=short#map' --db catalog.db"
    )]
    Decode {
        url: String,
        /// Catalog database used to resolve path segments.
        #[arg(long)]
        db: Option<PathBuf>,
    },

    #[command(
        about = "Encode filter state JSON into a catalog URL",
        after_help = "EXAMPLES:\n    adventure encode '{\"country_slug\":\"italy\",\"expanded\":true}'"
    )]
    Encode { state: String },

    #[command(
        about = "Decode a URL and list matching adventures",
        after_help = "EXAMPLES:\n    adventure browse '/italy?age=18%2B' --db catalog.db --config adventure.toml"
    )]
    Browse {
        url: String,
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Chip search term.
        #[arg(long, default_value = "")]
        chip_search: String,
    },

    #[command(
        about = "Import a JSON catalog fixture",
        after_help = "EXAMPLES:\n    adventure seed --db catalog.db --file catalog.json"
    )]
    Seed {
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_cli_logging(&cli)?;

    match cli.command {
        Commands::Decode { url, db } => run_decode(&url, db),
        Commands::Encode { state } => run_encode(&state),
        Commands::Browse {
            url,
            db,
            config,
            chip_search,
        } => run_browse(&url, db, config, &chip_search),
        Commands::Seed { db, file } => run_seed(db, file),
    }
}

fn init_cli_logging(cli: &Cli) -> Result<()> {
    match (&cli.log_dir, &cli.log_level) {
        (Some(dir), level) => {
            let level = level.as_deref().unwrap_or(default_log_level());
            init_logging(level, dir).context("failed to start file logging")
        }
        (None, Some(level)) => init_stderr_logging(level).context("failed to start logging"),
        (None, None) => Ok(()),
    }
}

fn run_decode(url: &str, db: Option<PathBuf>) -> Result<()> {
    let taxonomy = match db {
        Some(path) => {
            let conn = open_db(&path)
                .with_context(|| format!("failed to open catalog `{}`", path.display()))?;
            SqliteTaxonomyRepository::new(&conn)
                .load_taxonomy()
                .context("failed to load taxonomy")?
        }
        None => Taxonomy::default(),
    };

    let report = decode_url(url, &taxonomy);
    let predicates = build_predicates(&report.state);
    let output = json!({
        "state": report.state,
        "canonical_url": encode(&report.state).to_url_string(),
        "predicates": predicates,
        "issues": report.issues,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_encode(state_json: &str) -> Result<()> {
    let state: FilterState =
        serde_json::from_str(state_json).context("state must be FilterState JSON")?;
    println!("{}", encode(&state).to_url_string());
    Ok(())
}

fn run_browse(
    url: &str,
    db: PathBuf,
    config_path: Option<PathBuf>,
    chip_search: &str,
) -> Result<()> {
    let config = match config_path {
        Some(path) => load_config(&path)
            .with_context(|| format!("failed to load config `{}`", path.display()))?,
        None => AppConfig::default(),
    };
    if logging_status().is_none() && config.logging.dir.is_some() {
        init_from_config(&config.logging).context("failed to start configured logging")?;
    }
    let conn =
        open_db(&db).with_context(|| format!("failed to open catalog `{}`", db.display()))?;
    let service = CatalogService::new(
        SqliteTaxonomyRepository::new(&conn),
        SqliteAdventureRepository::new(&conn),
        config,
    );

    let view = service
        .browse_with_chip_search(url, chip_search)
        .context("browse failed")?;
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn run_seed(db: PathBuf, file: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read fixture `{}`", file.display()))?;
    let fixture: seed::CatalogFixture =
        serde_json::from_str(&text).context("fixture is not valid catalog JSON")?;
    let conn =
        open_db(&db).with_context(|| format!("failed to open catalog `{}`", db.display()))?;

    let summary = seed::import(
        &SqliteTaxonomyRepository::new(&conn),
        &SqliteAdventureRepository::new(&conn),
        fixture,
    )?;
    info!(
        "event=catalog_seed module=cli status=ok activities={} countries={} adventures={}",
        summary.activities, summary.countries, summary.adventures
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
