//! `trove`: load parsed trial registrations and MeSH descriptors into the
//! warehouse.
//!
//! Reads `trove.toml` (or the path given with `--config`), layered with
//! `TROVE_*` environment variables.
//!
//! ```
//! trove init
//! trove import studies studies.json
//! trove import qualifiers qualifiers.json
//! trove show study 1 --with keywords,sponsors
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use trove_core::registry;
use trove_loader::{LoaderConfig, import};
use trove_store_sqlite::Warehouse;

#[derive(Parser)]
#[command(author, version, about = "Clinical-trial and MeSH warehouse loader")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "trove.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create the warehouse file and its tables.
  Init,
  /// Ingest a JSON array of parsed documents.
  Import {
    #[command(subcommand)]
    kind: ImportKind,
  },
  /// Print one row, optionally with related rows, as JSON.
  Show {
    entity: String,
    id:     i64,
    /// Relations to load, comma separated.
    #[arg(long = "with", value_delimiter = ',')]
    with:   Vec<String>,
  },
  /// Row count of every table.
  Stats,
}

#[derive(Subcommand)]
enum ImportKind {
  Studies { file: PathBuf },
  Descriptors { file: PathBuf },
  Qualifiers { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TROVE"))
    .build()
    .context("failed to read config file")?;
  let cfg: LoaderConfig = settings
    .try_deserialize()
    .context("failed to deserialise LoaderConfig")?;

  let store_path = cfg.resolved_store_path();
  let warehouse = Warehouse::open_with(&store_path, &cfg.store())
    .await
    .with_context(|| format!("failed to open warehouse at {store_path:?}"))?;

  match cli.command {
    Command::Init => {
      tracing::info!(path = %store_path.display(), "warehouse ready");
    }
    Command::Import { kind: ImportKind::Studies { file } } => {
      let documents = import::read_documents(&file)?;
      let report = import::import_studies(&warehouse, documents).await?;
      println!("{} imported, {} failed", report.imported, report.failed);
    }
    Command::Import { kind: ImportKind::Descriptors { file } } => {
      let documents = import::read_documents(&file)?;
      let report = import::import_descriptors(&warehouse, documents).await?;
      println!("{} imported, {} failed", report.imported, report.failed);
    }
    Command::Import { kind: ImportKind::Qualifiers { file } } => {
      let documents = import::read_documents(&file)?;
      let report = import::import_qualifiers(&warehouse, documents).await?;
      println!("{} imported, {} failed", report.imported, report.failed);
    }
    Command::Show { entity, id, with } => {
      let entity = registry::by_name(&entity)?;
      let joined = warehouse
        .run(move |dal| {
          let relations = with.iter().map(String::as_str).collect::<Vec<_>>();
          dal.get_joined(entity, id, &relations, None)
        })
        .await?
        .with_context(|| format!("{} {id} not found", entity.name))?;
      println!("{}", serde_json::to_string_pretty(&joined)?);
    }
    Command::Stats => {
      for (table, count) in warehouse.counts().await? {
        println!("{table:<32} {count:>10}");
      }
    }
  }

  Ok(())
}
