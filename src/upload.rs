use std::path::PathBuf;

use log::{info, warn};
use mongodb::{
    bson::{doc, Document},
    sync::Client,
};

use crate::{
    config::ConnectionSettings,
    core::{
        item::{ItemProcessor, ItemReader, ItemWriter},
        job::{Job, JobBuilder},
        progress,
        step::{StepBuilder, StepExecution, WriteMode},
    },
    fighter::record::{FighterDocument, RawRow},
    item::{
        csv::csv_reader::CsvItemReaderBuilder, json::json_writer::JsonItemWriterBuilder,
        logger::LoggerWriter, mongodb::mongodb_writer::MongodbItemWriterBuilder,
    },
    BatchError,
};

/// Where the processed documents go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Log every document and store nothing.
    DryRun,
    /// Write all documents to one JSON array file.
    Json(PathBuf),
    /// Replace documents by `_id` in a MongoDB collection.
    Mongodb {
        credentials: PathBuf,
        collection: String,
    },
}

#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub job_name: String,
    pub csv: PathBuf,
    pub destination: Destination,
    pub chunk_size: usize,
    pub write_mode: WriteMode,
}

/// Loads the CSV export into the destination and logs the final summary.
///
/// # Errors
/// Fails when the export cannot be read, the destination cannot be opened or
/// no connection settings are found. Rows that fail on their own are counted
/// in the returned execution instead.
pub fn upload(
    options: &UploadOptions,
    processor: &dyn ItemProcessor<RawRow, FighterDocument>,
) -> Result<StepExecution, BatchError> {
    info!("Reading fighter data from {}", options.csv.display());
    let reader = CsvItemReaderBuilder::new().from_path(&options.csv)?;

    let step_execution = match &options.destination {
        Destination::DryRun => {
            info!("Dry run: documents are logged, nothing is stored");
            let writer = LoggerWriter::default();
            run_job(options, &reader, processor, &writer)?
        }
        Destination::Json(path) => {
            info!("Writing documents to {}", path.display());
            let writer = JsonItemWriterBuilder::new()
                .pretty_formatter(true)
                .from_path(path)?;
            run_job(options, &reader, processor, &writer)?
        }
        Destination::Mongodb {
            credentials,
            collection,
        } => {
            let settings = ConnectionSettings::resolve(credentials)?;
            let client = Client::with_uri_str(&settings.uri)
                .map_err(|error| BatchError::Configuration(error.to_string()))?;
            check_server(&client, options.write_mode)?;

            info!(
                "Uploading to collection {} of database {}",
                collection, settings.database
            );
            let collection = client
                .database(&settings.database)
                .collection::<Document>(collection);
            let writer = MongodbItemWriterBuilder::new()
                .client(&client)
                .collection(&collection)
                .build()?;
            run_job(options, &reader, processor, &writer)?
        }
    };

    progress::report_summary(&step_execution);
    Ok(step_execution)
}

fn run_job(
    options: &UploadOptions,
    reader: &dyn ItemReader<RawRow>,
    processor: &dyn ItemProcessor<RawRow, FighterDocument>,
    writer: &dyn ItemWriter<FighterDocument>,
) -> Result<StepExecution, BatchError> {
    let step = StepBuilder::new(&options.job_name)
        .chunk::<RawRow, FighterDocument>(options.chunk_size)
        .reader(reader)
        .processor(processor)
        .writer(writer)
        .write_mode(options.write_mode)
        .build()?;

    let job = JobBuilder::new()
        .name(options.job_name.clone())
        .start(&step)
        .build();

    job.run()?
        .step_executions
        .pop()
        .ok_or_else(|| BatchError::Step(options.job_name.clone()))
}

/// Fails when the server is unreachable and warns when chunk transactions
/// cannot work on it.
fn check_server(client: &Client, write_mode: WriteMode) -> Result<(), BatchError> {
    let hello = client
        .database("admin")
        .run_command(doc! { "hello": 1 })
        .run()
        .map_err(|error| BatchError::Configuration(format!("database unreachable: {error}")))?;

    let replica_set = hello.get_str("setName").is_ok();
    let sharded = matches!(hello.get_str("msg"), Ok("isdbgrid"));

    if write_mode == WriteMode::Chunk && !replica_set && !sharded {
        warn!("Standalone server: transactions are not supported, every chunk will be written item by item");
    }

    Ok(())
}
