//! Novel Tracker CLI
//!
//! Bulk import, manual add, edit and browse against a Novel Store API.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use novel_tracker::{
    config::{self, Overrides},
    error::{AppError, Result},
    models::{Novel, NovelId, NovelStatus},
    pipeline::{self, EditOutcome, NovelFilter},
    services::{HttpNovelStore, NovelStore},
    utils::display,
};
use serde_json::{Map, Value};

/// Novel Tracker - reading list catalog tool
#[derive(Parser, Debug)]
#[command(
    name = "novel-tracker",
    version,
    about = "Import, edit and browse a reading-list novel catalog"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the store base URL from the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize spreadsheet rows (JSON array) and bulk insert them
    Import {
        /// JSON file holding an array of row objects
        file: PathBuf,

        /// Print the normalized novels without sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Add one novel from a Novel-shaped JSON file
    Add { file: PathBuf },

    /// Edit a novel with namespaced keys (e.g. novelDetails_status=Completed)
    Edit {
        id: String,

        /// KEY=VALUE assignment; VALUE is parsed as JSON when possible
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// JSON object of edits, applied before --set
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show one or more novels
    Show {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Look novels up by name
    Find { name: String },

    /// List novels, optionally filtered
    List {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        genre: Option<String>,

        /// Reading, Completed, Dropped, "On Hold" or "Plan to Read"
        #[arg(long, value_parser = parse_status)]
        status: Option<NovelStatus>,

        /// Only favorites
        #[arg(long)]
        favorites: bool,

        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
        min_rating: Option<u8>,
    },

    /// Validate configuration
    Validate,
}

fn parse_status(raw: &str) -> std::result::Result<NovelStatus, String> {
    NovelStatus::from_label(raw).ok_or_else(|| format!("unknown status '{}'", raw))
}

/// Initialize logging with the configured default filter.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn read_json(path: &Path) -> Result<Value> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn collect_edits(file: Option<PathBuf>, set: &[String]) -> Result<Map<String, Value>> {
    let mut edits = match file {
        Some(path) => match read_json(&path).await? {
            Value::Object(map) => map,
            _ => {
                return Err(AppError::input_shape(format!(
                    "{} must hold a JSON object of edits",
                    path.display()
                )));
            }
        },
        None => Map::new(),
    };
    edits.extend(pipeline::parse_assignments(set)?);
    Ok(edits)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = Overrides {
        base_url: cli.base_url.clone(),
        log_level: cli.verbose.then(|| "debug".to_string()),
    };
    let config = config::load_all(&cli.config, &overrides);
    let level = match &config {
        Ok(c) => c.logging.level.clone(),
        Err(_) => overrides.log_level.clone().unwrap_or_else(|| "info".to_string()),
    };
    init_logging(&level);

    let config = config?;
    log::debug!("Store base URL: {}", config.store.base_url);

    let store = HttpNovelStore::from_config(&config.store)?;

    match cli.command {
        Command::Import { file, dry_run } => {
            let rows = pipeline::read_rows(&file).await?;
            let report =
                pipeline::run_import(&store, &rows, dry_run || config.import.dry_run).await?;
            log::info!("Imported {} of {} rows", report.inserted, report.rows);
        }

        Command::Add { file } => {
            let novel: Novel = serde_json::from_value(read_json(&file).await?)?;
            let created = pipeline::run_add(&store, &novel).await?;
            print!("{}", display::novel_card(&created));
        }

        Command::Edit { id, set, file } => {
            let edits = collect_edits(file, &set).await?;
            if edits.is_empty() {
                return Err(AppError::validation("no edits given (use --set or --file)"));
            }

            match pipeline::run_edit(&store, &NovelId::from(id.as_str()), &edits).await? {
                EditOutcome::Unchanged(novel) => {
                    println!("Nothing to submit: {} already matches.", novel.label());
                }
                EditOutcome::Updated { novel, changed, .. } => {
                    display::summary(
                        &format!("Updated {}", novel.label()),
                        &changed
                            .iter()
                            .map(|(k, v)| (k.as_str(), v.to_string()))
                            .collect::<Vec<_>>(),
                    );
                }
            }
        }

        Command::Show { ids } => {
            let ids: Vec<NovelId> = ids.iter().map(|id| NovelId::from(id.as_str())).collect();
            let novels =
                pipeline::fetch_many(&store, &ids, config.store.max_concurrent).await?;
            for novel in &novels {
                println!("{}", display::novel_card(novel));
            }
        }

        Command::Find { name } => {
            let novels = store.find_by_name(&name).await?;
            display::novel_list(&novels);
        }

        Command::List {
            name,
            genre,
            status,
            favorites,
            min_rating,
        } => {
            let filter = NovelFilter {
                name,
                genre,
                status,
                favorites_only: favorites,
                min_rating,
            };
            let novels = pipeline::run_list(&store, &filter).await?;
            display::novel_list(&novels);
        }

        Command::Validate => {
            log::info!("✓ Config OK (store at {})", store.base_url());
        }
    }

    Ok(())
}
