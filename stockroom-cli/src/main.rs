mod paths;
mod report;
mod settings;
mod table;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::{debug, info};
use simplelog::{Config, LevelFilter, WriteLogger};
use stockroom_lib::export::{IMPORT_TEMPLATES, export_to_file, import_template, to_csv_string};
use stockroom_lib::inventory::dashboard::DashboardFilter;
use stockroom_lib::inventory::{
    DemoSource, EntityKind, FallbackSource, JsonFileSource, validate_json,
};
use stockroom_lib::settings::SettingsContext;
use stockroom_lib::store::{LocalStore, MemoryStore, SqliteStore};
use stockroom_lib::table::{DEFAULT_NAMESPACE, TableOptions};

use crate::settings::SettingsAction;
use crate::table::TableAction;

/// Inventory tables in the terminal.
#[derive(Parser, Debug)]
#[command(name = "stockroom", version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Local store file (defaults to the platform data directory)
    #[arg(long, global = true, conflicts_with = "memory")]
    db: Option<PathBuf>,
    /// Keep views and settings in memory for this run only
    #[arg(long, global = true)]
    memory: bool,
    /// JSON export to read collections from; demo data fills any gaps
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Rows per page
    #[arg(long, global = true, default_value_t = 10)]
    page_size: usize,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show or change one collection's table view
    Table {
        /// Collection name, e.g. items or purchase-orders
        entity: EntityKind,
        #[command(subcommand)]
        action: Option<TableAction>,
    },
    /// List saved table views
    Views,
    /// Show or change application settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
    /// Batches in first-expired-first-out order
    Fefo {
        /// Only this item's active batches
        #[arg(long)]
        item: Option<i64>,
    },
    /// Reorder suggestions
    Replenish,
    /// Dashboard chart series
    Charts,
    /// Write a header-only CSV import template
    Template {
        /// items, suppliers, inventory or purchase-orders
        entity: EntityKind,
        /// Output file (`-` for stdout); defaults to `<Name>.template.csv`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a JSON record against a collection's form rules
    Validate {
        entity: EntityKind,
        /// File holding one JSON object, or `-` for stdin
        file: PathBuf,
    },
    /// Headline figures and items needing attention
    Dashboard {
        #[arg(long)]
        type_id: Option<i64>,
        #[arg(long)]
        brand_id: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = open_store(&cli).await?;
    let source = match &cli.data {
        Some(path) => FallbackSource::new(JsonFileSource::new(path), DemoSource::new()),
        None => FallbackSource::demo(DemoSource::new()),
    };
    let options = TableOptions::new().with_page_size(cli.page_size.max(1));
    let now = Utc::now();

    match cli.command {
        Command::Table { entity, action } => {
            table::dispatch(
                entity,
                &source,
                store,
                action.unwrap_or(TableAction::Show),
                options,
            )
            .await?;
        }
        Command::Views => {
            let mut keys = store.keys_with_prefix(DEFAULT_NAMESPACE).await?;
            keys.sort();
            if keys.is_empty() {
                println!("no saved views");
            }
            for key in keys {
                println!("{}", key);
            }
        }
        Command::Settings { action } => {
            let mut ctx = SettingsContext::load(store).await;
            settings::run(&mut ctx, action.unwrap_or(SettingsAction::Show)).await?;
        }
        Command::Fefo { item } => report::fefo(&source.dataset().await, item)?,
        Command::Replenish => {
            report::replenish(&source.dataset().await, store, options, now).await?;
        }
        Command::Charts => report::charts(&source.dataset().await, now),
        Command::Template { entity, output } => write_template(entity, output)?,
        Command::Validate { entity, file } => validate_record(entity, &file)?,
        Command::Dashboard { type_id, brand_id } => {
            let filter = DashboardFilter { type_id, brand_id };
            report::dashboard(&source.dataset().await, filter, store, options, now).await?;
        }
    }

    Ok(())
}

fn write_template(kind: EntityKind, output: Option<PathBuf>) -> Result<()> {
    let Some(template) = import_template(kind) else {
        let importable: Vec<&str> = IMPORT_TEMPLATES.iter().map(|t| t.kind.name()).collect();
        bail!("{} cannot be imported (templates exist for: {})", kind, importable.join(", "));
    };
    let data = template.data();
    match output {
        Some(path) if path.as_os_str() == "-" => print!("{}", to_csv_string(&data)?),
        output => {
            let path = output.unwrap_or_else(|| PathBuf::from(template.file_name()));
            export_to_file(&data, &path)?;
            eprintln!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn validate_record(kind: EntityKind, file: &Path) -> Result<()> {
    let text = if file.as_os_str() == "-" {
        io::read_to_string(io::stdin()).context("reading stdin")?
    } else {
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?
    };
    let input: serde_json::Value = serde_json::from_str(&text).context("parsing record")?;
    match validate_json(kind, &input) {
        Ok(entity) => {
            println!("{}", serde_json::to_string_pretty(&entity)?);
            Ok(())
        }
        Err(e) => {
            debug!("{} record rejected: {}", kind, e);
            for field in &e.fields {
                eprintln!("{}", field);
            }
            bail!("{} record is invalid", kind)
        }
    }
}

/// Log to `latest.log` in the cache directory, archiving the previous run's
/// log. Logging is skipped when no cache directory is available.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    paths::rotate_logs();
    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(level, Config::default(), file) {
                eprintln!("logging disabled: {}", e);
            }
        }
        Err(e) => eprintln!("logging disabled: {}: {}", path.display(), e),
    }
}

async fn open_store(cli: &Cli) -> Result<Arc<dyn LocalStore>> {
    if cli.memory {
        debug!("using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = match &cli.db {
        Some(path) => path.clone(),
        None => paths::store_db().context("no data directory; pass --db or --memory")?,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    info!("opening store {}", path.display());
    let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    Ok(Arc::new(store))
}
