//! Create a sample measurements database and matching SQL templates

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gq_data::sample::{create_sample_database, write_sample_templates};
use gq_server::init_logging;

#[derive(Debug, Parser)]
#[command(name = "gq-seed", about = "Generate sample data for the geo query server")]
struct Args {
    /// Database file to create or extend
    #[arg(long, default_value = "data/measurements.db")]
    database: PathBuf,

    /// Directory to write the templates into
    #[arg(long, default_value = "sql")]
    templates_dir: PathBuf,

    /// Number of measurements to generate
    #[arg(long, default_value_t = 5_000)]
    rows: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging("info");

    if let Some(parent) = args.database.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    create_sample_database(&args.database, args.rows)
        .with_context(|| format!("seeding {}", args.database.display()))?;
    write_sample_templates(&args.templates_dir)
        .with_context(|| format!("writing templates to {}", args.templates_dir.display()))?;

    tracing::info!(
        database = %args.database.display(),
        templates = %args.templates_dir.display(),
        rows = args.rows,
        "sample data ready"
    );
    Ok(())
}
