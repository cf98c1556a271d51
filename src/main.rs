use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use waymark_settings::config::AppConfig;
use waymark_settings::import::migrate_import_document;
use waymark_settings::logging::init_logging;
use waymark_settings::migration::{Migrator, CURRENT_SCHEMA_VERSION};
use waymark_settings::store::PreferenceStore;
use waymark_settings::validation::InputValidator;

#[derive(Parser)]
#[command(author, version, about = "Preference store and settings migration tool for the Waymark map app", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pending settings migrations against the preference store
    Migrate {
        /// Preference store directory (defaults to the configured one)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Treat this launch as a fresh install: stamp the current schema
        /// version without rewriting anything
        #[arg(long)]
        first_launch: bool,
    },
    /// Migrate an exported settings document to the current schema
    Import {
        /// Input JSON file (flat object of string values)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the schema version the preference store conforms to
    Status {
        /// Preference store directory (defaults to the configured one)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    let _guard = init_logging(
        Some(&config.get_log_level()),
        &config.logging.format,
        config.logging.file_path.as_deref().map(Path::new),
    )?;

    info!("Starting waymark-settings");

    // Parse command line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate {
            data_dir,
            first_launch,
        } => run_migrate(&config, data_dir, first_launch),
        Commands::Import { input, output } => run_import(&config, &input, output.as_deref()),
        Commands::Status { data_dir } => run_status(&config, data_dir),
    }
}

fn resolve_data_dir(config: &AppConfig, data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(|| PathBuf::from(&config.storage.data_dir))
}

fn open_store(config: &AppConfig, data_dir: Option<PathBuf>) -> Result<PreferenceStore> {
    let dir = resolve_data_dir(config, data_dir);
    InputValidator::validate_data_dir(&dir)?;
    let store = PreferenceStore::open(&dir)
        .with_context(|| format!("Failed to open preference store at {}", dir.display()))?;
    Ok(store)
}

fn run_migrate(config: &AppConfig, data_dir: Option<PathBuf>, first_launch: bool) -> Result<()> {
    let store = open_store(config, data_dir)?;
    let migrator = Migrator::new(store)?;
    migrator
        .migrate_if_needed(first_launch)
        .context("Settings migration failed")?;
    info!(
        version = CURRENT_SCHEMA_VERSION,
        "preference store is at the current schema"
    );
    Ok(())
}

fn run_import(config: &AppConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read import file {}", input.display()))?;
    let doc: BTreeMap<String, String> =
        serde_json::from_str(&raw).context("Import file must be a flat JSON object of strings")?;

    let migrated = migrate_import_document(&doc);
    let renamed = migrated.keys().filter(|k| !doc.contains_key(*k)).count();
    info!(
        entries = migrated.len(),
        keys_renamed = renamed,
        "migrated import document"
    );

    let rendered = if config.import.pretty {
        serde_json::to_string_pretty(&migrated)?
    } else {
        serde_json::to_string(&migrated)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(output = %path.display(), "wrote migrated document");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn run_status(config: &AppConfig, data_dir: Option<PathBuf>) -> Result<()> {
    let store = open_store(config, data_dir)?;
    let migrator = Migrator::new(store)?;
    let version = migrator.schema_version()?;
    println!(
        "schema version: {version} (current: {CURRENT_SCHEMA_VERSION}{})",
        if version >= CURRENT_SCHEMA_VERSION {
            ", up to date"
        } else {
            ", migration pending"
        }
    );
    Ok(())
}
