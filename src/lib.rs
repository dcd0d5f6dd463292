#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # fightstats-loader

 Migrates fighter statistics from a CSV export into a document collection.

 Each data row of the export becomes one document. Values are coerced to
 integers, floats or text, empty values are left out, and every document is
 keyed by `_id`, then `fighterCode`, then its position in the file. Stores
 replace documents by key, so a load can be repeated safely.

 The load runs as a chunk-oriented step:

 - an [`ItemReader`](core::item::ItemReader) yields the rows of the export;
 - an [`ItemProcessor`](core::item::ItemProcessor) turns each row into a
   [`FighterDocument`](fighter::record::FighterDocument);
 - an [`ItemWriter`](core::item::ItemWriter) stores each chunk as one unit
   and, when the chunk is rejected, every document of it on its own.

 Two binaries drive it. `upload-fighter-data` stores flat documents one at a
 time. `upload-fighter-data-batch` groups the statistic columns into
 categories, attaches fighter names and commits chunks atomically.

 ## Example

 ```
 # use fightstats_loader::{
 #     core::{job::{Job, JobBuilder}, step::{StepBuilder, WriteMode}},
 #     fighter::{category::CategoryTable, processor::FighterDocumentProcessorBuilder, record::{FighterDocument, RawRow}},
 #     item::{csv::csv_reader::CsvItemReaderBuilder, logger::LoggerWriter},
 #     BatchError,
 # };
 # fn main() -> Result<(), BatchError> {
 let csv = "_id,fighterCode,FighterWins,JabsAA\n42,F1,12,0.45\n";

 let reader = CsvItemReaderBuilder::new().from_reader(csv.as_bytes())?;
 let categories = CategoryTable::fighter_stats();
 let processor = FighterDocumentProcessorBuilder::new()
     .categories(&categories)
     .build();
 let writer = LoggerWriter::default();

 let step = StepBuilder::new("upload")
     .chunk::<RawRow, FighterDocument>(500)
     .reader(&reader)
     .processor(&processor)
     .writer(&writer)
     .write_mode(WriteMode::Chunk)
     .build()?;

 let job = JobBuilder::new().start(&step).build();
 let execution = job.run()?;

 assert_eq!(execution.step_executions[0].write_count, 1);
 # Ok(())
 # }
 ```
*/

/// Reading, processing and writing items in chunks.
pub mod core;

/// Command-line defaults and credential resolution.
pub mod config;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Turning CSV rows into fighter documents.
pub mod fighter;

/// Readers and writers.
pub mod item;

/// Wiring of reader, processor and writer for the upload binaries.
#[cfg(all(feature = "json", feature = "logger", feature = "mongodb"))]
pub mod upload;
