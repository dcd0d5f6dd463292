use crate::error::BatchError;

/// Result of reading one item: `Ok(None)` once the source is exhausted.
pub type ItemReaderResult<I> = Result<Option<I>, BatchError>;

/// Result of processing one item.
pub type ItemProcessorResult<O> = Result<O, BatchError>;

/// Result of a writer operation.
pub type ItemWriterResult = Result<(), BatchError>;

/// Retrieves input for a step, one item at a time.
pub trait ItemReader<I> {
    fn read(&self) -> ItemReaderResult<I>;
}

/// Business logic turning a read item into the item that gets written.
pub trait ItemProcessor<I, O> {
    fn process(&self, item: &I) -> ItemProcessorResult<O>;
}

/// Output of a step.
///
/// `write` receives a whole chunk and must apply it as one unit: either every
/// item is stored or the call fails and none of them counts as stored.
/// `write_item` stores a single item on its own and is what the step falls
/// back to when a chunk is rejected.
pub trait ItemWriter<O> {
    fn write(&self, items: &[O]) -> ItemWriterResult;

    fn write_item(&self, item: &O) -> ItemWriterResult {
        self.write(std::slice::from_ref(item))
    }

    fn flush(&self) -> ItemWriterResult {
        Ok(())
    }

    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}
