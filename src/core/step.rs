use std::{
    fmt::Debug,
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    item::{ItemProcessor, ItemReader, ItemWriter},
    progress,
};

/// Status of a step execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The step has been created or is running.
    Starting,
    /// Every chunk went through the step. Individual items may still have failed.
    Success,
    /// The input could not be read; nothing was written.
    ReadError,
    /// The writer could not be opened; nothing was written.
    WriteError,
}

/// How staged items reach the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Commit each chunk as one unit and replay its items one by one if the
    /// commit is rejected.
    #[default]
    Chunk,
    /// Write every item on its own. Chunks only pace progress reporting.
    Item,
}

/// Outcome of one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkSummary {
    /// 1-based chunk number.
    pub number: usize,
    /// 1-based position of the first item of the chunk in the step input.
    pub first_item: usize,
    /// 1-based position of the last item of the chunk in the step input.
    pub last_item: usize,
    /// Items stored, either by the chunk commit or by the fallback.
    pub written: usize,
    /// Items dropped because the processor rejected them.
    pub process_errors: usize,
    /// Items the writer failed to store.
    pub write_errors: usize,
    /// Whether the chunk commit was rejected and items were written one by one.
    pub fallback: bool,
}

impl ChunkSummary {
    pub fn size(&self) -> usize {
        self.last_item + 1 - self.first_item
    }

    pub fn error_count(&self) -> usize {
        self.process_errors + self.write_errors
    }
}

/// Counters and timing of one step run.
///
/// A fresh execution is created for every run so that counters never leak
/// between runs.
#[derive(Debug)]
pub struct StepExecution {
    /// Unique identifier for this step instance
    pub id: Uuid,
    /// Human-readable name for the step
    pub name: String,
    /// Current status of the step execution
    pub status: StepStatus,
    pub start_time: Instant,
    pub end_time: Instant,
    pub duration: Duration,
    /// Number of items successfully read
    pub read_count: usize,
    /// Number of items successfully written
    pub write_count: usize,
    /// Number of items rejected by the processor
    pub process_error_count: usize,
    /// Number of items the writer failed to store
    pub write_error_count: usize,
    /// One entry per chunk, in processing order
    pub chunks: Vec<ChunkSummary>,
}

impl StepExecution {
    pub fn new(name: &str) -> Self {
        let now = Instant::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            status: StepStatus::Starting,
            start_time: now,
            end_time: now,
            duration: Duration::default(),
            read_count: 0,
            write_count: 0,
            process_error_count: 0,
            write_error_count: 0,
            chunks: Vec::new(),
        }
    }

    /// Items that did not make it to the store, whatever the reason.
    pub fn error_count(&self) -> usize {
        self.process_error_count + self.write_error_count
    }
}

pub trait Step {
    fn get_name(&self) -> &str;

    /// Executes the step.
    ///
    /// # Returns
    /// - `Ok(())`: every chunk went through, see `step_execution` for counters
    /// - `Err(BatchError)`: a fatal precondition failed before any write
    fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError>;
}

/// Step that reads all items, then processes and writes them chunk by chunk.
///
/// Processor failures skip the item. A rejected chunk commit falls back to
/// writing each staged item of that chunk exactly once. Neither aborts the
/// step: only an unreadable input or a writer that cannot be opened does.
pub struct ChunkOrientedStep<'a, I, O> {
    name: String,
    /// Component responsible for reading items from the source
    reader: &'a dyn ItemReader<I>,
    /// Component responsible for processing items
    processor: &'a dyn ItemProcessor<I, O>,
    /// Component responsible for writing items to the destination
    writer: &'a dyn ItemWriter<O>,
    /// Number of items to process in each chunk
    chunk_size: usize,
    write_mode: WriteMode,
}

impl<I: Debug, O> Step for ChunkOrientedStep<'_, I, O> {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
        let start_time = Instant::now();
        step_execution.status = StepStatus::Starting;

        info!(
            "Start of step: {}, id: {}",
            step_execution.name, step_execution.id
        );

        let result = self.run(step_execution);

        step_execution.start_time = start_time;
        step_execution.end_time = Instant::now();
        step_execution.duration = start_time.elapsed();

        info!(
            "End of step: {}, id: {}",
            step_execution.name, step_execution.id
        );

        match result {
            Ok(()) => {
                step_execution.status = StepStatus::Success;
                Ok(())
            }
            Err(error) => {
                error!("Step {} failed: {}", step_execution.name, error);
                Err(error)
            }
        }
    }
}

impl<I: Debug, O> ChunkOrientedStep<'_, I, O> {
    fn run(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
        let items = self.read_all(step_execution).inspect_err(|_| {
            step_execution.status = StepStatus::ReadError;
        })?;

        self.writer.open().inspect_err(|_| {
            step_execution.status = StepStatus::WriteError;
        })?;

        let total = items.len();
        info!("Found {} items to write", total);
        info!("Using chunk size: {}", self.chunk_size);

        for (index, chunk) in items.chunks(self.chunk_size).enumerate() {
            let first_item = index * self.chunk_size + 1;
            let mut summary = ChunkSummary {
                number: index + 1,
                first_item,
                last_item: first_item + chunk.len() - 1,
                ..ChunkSummary::default()
            };

            progress::chunk_started(&summary);

            let (positions, staged) = self.process_chunk(step_execution, &mut summary, chunk);

            match self.write_mode {
                WriteMode::Chunk => {
                    self.write_chunk(step_execution, &mut summary, &positions, &staged)
                }
                WriteMode::Item => {
                    self.write_items(step_execution, &mut summary, &positions, &staged)
                }
            }

            progress::chunk_finished(&summary, step_execution, total);
            step_execution.chunks.push(summary);
        }

        Self::manage_error(self.writer.close());

        Ok(())
    }

    /// Drains the reader. Any read error is fatal so that nothing gets written
    /// from a partially readable input.
    fn read_all(&self, step_execution: &mut StepExecution) -> Result<Vec<I>, BatchError> {
        debug!("Start reading items");
        let mut items = Vec::new();

        while let Some(item) = self.reader.read()? {
            items.push(item);
            step_execution.read_count += 1;
        }

        debug!("End reading items: {}", items.len());
        Ok(items)
    }

    /// Processes every item of the chunk and returns the staged output along
    /// with the 1-based position of each staged item.
    fn process_chunk(
        &self,
        step_execution: &mut StepExecution,
        summary: &mut ChunkSummary,
        chunk: &[I],
    ) -> (Vec<usize>, Vec<O>) {
        debug!("Processing chunk of {} items", chunk.len());
        let mut positions = Vec::with_capacity(chunk.len());
        let mut staged = Vec::with_capacity(chunk.len());

        for (offset, item) in chunk.iter().enumerate() {
            let position = summary.first_item + offset;
            match self.processor.process(item) {
                Ok(processed_item) => {
                    positions.push(position);
                    staged.push(processed_item);
                }
                Err(error) => {
                    step_execution.process_error_count += 1;
                    summary.process_errors += 1;
                    warn!("Item {} skipped: {}", position, error);
                    warn!("   Item data: {:?}", item);
                }
            }
        }

        (positions, staged)
    }

    fn write_chunk(
        &self,
        step_execution: &mut StepExecution,
        summary: &mut ChunkSummary,
        positions: &[usize],
        staged: &[O],
    ) {
        if staged.is_empty() {
            debug!("No items to write, skipping write call");
            return;
        }

        match self.writer.write(staged) {
            Ok(()) => {
                step_execution.write_count += staged.len();
                summary.written += staged.len();
                Self::manage_error(self.writer.flush());
            }
            Err(error) => {
                warn!("Chunk {} failed: {}", summary.number, error);
                warn!(
                    "   All {} items of chunk {} will be retried individually",
                    staged.len(),
                    summary.number
                );
                summary.fallback = true;
                self.write_items(step_execution, summary, positions, staged);
            }
        }
    }

    fn write_items(
        &self,
        step_execution: &mut StepExecution,
        summary: &mut ChunkSummary,
        positions: &[usize],
        staged: &[O],
    ) {
        for (position, item) in positions.iter().zip(staged) {
            match self.writer.write_item(item) {
                Ok(()) => {
                    step_execution.write_count += 1;
                    summary.written += 1;
                }
                Err(error) => {
                    step_execution.write_error_count += 1;
                    summary.write_errors += 1;
                    error!("Write failed for item {}: {}", position, error);
                }
            }
        }

        Self::manage_error(self.writer.flush());
    }

    /// Logs errors from operations that must not fail the step.
    fn manage_error(result: Result<(), BatchError>) {
        if let Err(error) = result {
            warn!("Non-fatal error: {}", error);
        }
    }
}

pub struct ChunkOrientedStepBuilder<'a, I, O> {
    name: String,
    reader: Option<&'a dyn ItemReader<I>>,
    processor: Option<&'a dyn ItemProcessor<I, O>>,
    writer: Option<&'a dyn ItemWriter<O>>,
    chunk_size: usize,
    write_mode: WriteMode,
}

impl<'a, I, O> ChunkOrientedStepBuilder<'a, I, O> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            reader: None,
            processor: None,
            writer: None,
            chunk_size: 10,
            write_mode: WriteMode::Chunk,
        }
    }

    pub fn reader(mut self, reader: &'a dyn ItemReader<I>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn processor(mut self, processor: &'a dyn ItemProcessor<I, O>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn writer(mut self, writer: &'a dyn ItemWriter<O>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Sets the number of items per chunk. Zero is raised to one.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn build(self) -> Result<ChunkOrientedStep<'a, I, O>, BatchError> {
        let missing = |component: &str| {
            BatchError::Configuration(format!(
                "{component} is required for building step {}",
                self.name
            ))
        };

        Ok(ChunkOrientedStep {
            reader: self.reader.ok_or_else(|| missing("Reader"))?,
            processor: self.processor.ok_or_else(|| missing("Processor"))?,
            writer: self.writer.ok_or_else(|| missing("Writer"))?,
            chunk_size: self.chunk_size,
            write_mode: self.write_mode,
            name: self.name,
        })
    }
}

pub struct StepBuilder {
    name: String,
}

impl StepBuilder {
    /// Starts a step. An empty name is replaced by a random one.
    pub fn new(name: &str) -> Self {
        let name = if name.is_empty() {
            build_name()
        } else {
            name.to_string()
        };
        Self { name }
    }

    pub fn chunk<'a, I, O>(self, chunk_size: usize) -> ChunkOrientedStepBuilder<'a, I, O> {
        ChunkOrientedStepBuilder::new(&self.name).chunk_size(chunk_size)
    }
}
