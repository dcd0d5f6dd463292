//! Uploads the fighter statistics export one document at a time.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::error;

use fightstats_loader::{
    config::{
        parse_batch_size, DEFAULT_COLLECTION, DEFAULT_CREDENTIALS_PATH, DEFAULT_CSV_PATH,
        SIMPLE_PROGRESS_INTERVAL,
    },
    core::step::WriteMode,
    fighter::processor::FighterDocumentProcessorBuilder,
    upload::{upload, Destination, UploadOptions},
};

#[derive(Parser, Debug)]
#[command(version, about = "Upload fighter statistics document by document")]
struct Args {
    /// Fighter statistics export
    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    csv: PathBuf,

    /// Destination collection
    #[arg(long, default_value = DEFAULT_COLLECTION)]
    collection: String,

    /// Rows between two progress reports
    #[arg(long, default_value_t = SIMPLE_PROGRESS_INTERVAL, value_parser = parse_batch_size)]
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
    let processor = FighterDocumentProcessorBuilder::new().build();

    let destination = match (args.dry_run, args.output) {
        (true, _) => Destination::DryRun,
        (false, Some(path)) => Destination::Json(path),
        (false, None) => Destination::Mongodb {
            credentials: args.credentials,
            collection: args.collection,
        },
    };

    let options = UploadOptions {
        job_name: "upload-fighter-data".to_string(),
        csv: args.csv,
        destination,
        chunk_size: args.batch_size,
        write_mode: WriteMode::Item,
    };

    upload(&options, &processor).context("upload failed")?;
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
