//! Uploads the fighter statistics export in atomic chunks.
//!
//! Statistic columns are grouped by category and each document gets the
//! fighter's display name when the names file knows its code.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::error;

use fightstats_loader::{
    config::{
        parse_batch_size, DEFAULT_BATCH_SIZE, DEFAULT_COLLECTION, DEFAULT_CREDENTIALS_PATH,
        DEFAULT_CSV_PATH, DEFAULT_NAMES_PATH,
    },
    core::step::WriteMode,
    fighter::{category::CategoryTable, names::NameIndex, processor::FighterDocumentProcessorBuilder},
    upload::{upload, Destination, UploadOptions},
};

#[derive(Parser, Debug)]
#[command(version, about = "Upload fighter statistics in atomic batches")]
struct Args {
    /// Fighter statistics export
    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    csv: PathBuf,

    /// Fighter names keyed by fighterCode
    #[arg(long, default_value = DEFAULT_NAMES_PATH)]
    names: PathBuf,

    /// Destination collection
    #[arg(long, default_value = DEFAULT_COLLECTION)]
    collection: String,

    /// Rows committed per transaction
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, value_parser = parse_batch_size)]
    batch_size: usize,

    /// JSON key file with the connection settings
    #[arg(long, default_value = DEFAULT_CREDENTIALS_PATH)]
    credentials: PathBuf,

    /// Log the documents instead of storing them
    #[arg(long)]
    dry_run: bool,

    /// Write the documents to a JSON file instead of the database
    #[arg(long, conflicts_with = "dry_run")]
    output: Option<PathBuf>,
}

fn run(args: Args) -> anyhow::Result<()> {
    let categories = CategoryTable::fighter_stats();
    let names = NameIndex::load(&args.names);

    let processor = FighterDocumentProcessorBuilder::new()
        .categories(&categories)
        .names(&names)
        .build();

    let destination = match (args.dry_run, args.output) {
        (true, _) => Destination::DryRun,
        (false, Some(path)) => Destination::Json(path),
        (false, None) => Destination::Mongodb {
            credentials: args.credentials,
            collection: args.collection,
        },
    };

    let options = UploadOptions {
        job_name: "upload-fighter-data-batch".to_string(),
        csv: args.csv,
        destination,
        chunk_size: args.batch_size,
        write_mode: WriteMode::Chunk,
    };

    upload(&options, &processor).context("batch upload failed")?;
    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}
