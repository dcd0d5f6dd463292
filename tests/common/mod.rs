#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashSet},
    io::Write,
};

use fightstats_loader::{
    core::item::{ItemWriter, ItemWriterResult},
    fighter::record::FighterDocument,
    BatchError,
};
use mockall::mock;
use serde_json::Value;
use tempfile::NamedTempFile;

mock! {
    pub Writer {}
    impl ItemWriter<FighterDocument> for Writer {
        fn write(&self, items: &[FighterDocument]) -> ItemWriterResult;
        fn write_item(&self, item: &FighterDocument) -> ItemWriterResult;
        fn flush(&self) -> ItemWriterResult;
        fn open(&self) -> ItemWriterResult;
        fn close(&self) -> ItemWriterResult;
    }
}

/// In-memory collection keyed by `_id`, replacing documents on write.
///
/// Chunk writes are all-or-nothing. They fail when chunks are disabled or
/// when any document of the chunk is listed as rejected; single writes fail
/// only for rejected documents.
#[derive(Default)]
pub struct MemoryStore {
    documents: RefCell<BTreeMap<String, Value>>,
    reject_chunks: Cell<bool>,
    rejected: HashSet<String>,
    chunk_writes: Cell<usize>,
    item_writes: Cell<usize>,
}

impl MemoryStore {
    pub fn rejecting(ids: &[&str]) -> Self {
        Self {
            rejected: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn without_transactions() -> Self {
        let store = Self::default();
        store.reject_chunks.set(true);
        store
    }

    pub fn documents(&self) -> BTreeMap<String, Value> {
        self.documents.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<Value> {
        self.documents.borrow().get(id).cloned()
    }

    pub fn chunk_writes(&self) -> usize {
        self.chunk_writes.get()
    }

    pub fn item_writes(&self) -> usize {
        self.item_writes.get()
    }

    fn store(&self, item: &FighterDocument) -> ItemWriterResult {
        let value =
            serde_json::to_value(item).map_err(|error| BatchError::ItemWriter(error.to_string()))?;
        self.documents
            .borrow_mut()
            .insert(item.id.as_str().to_string(), value);
        Ok(())
    }
}

impl ItemWriter<FighterDocument> for MemoryStore {
    fn write(&self, items: &[FighterDocument]) -> ItemWriterResult {
        self.chunk_writes.set(self.chunk_writes.get() + 1);

        if self.reject_chunks.get() {
            return Err(BatchError::ItemWriter("transactions unavailable".to_string()));
        }
        if let Some(item) = items.iter().find(|item| self.rejected.contains(item.id.as_str())) {
            return Err(BatchError::ItemWriter(format!("document {} rejected", item.id)));
        }

        items.iter().try_for_each(|item| self.store(item))
    }

    fn write_item(&self, item: &FighterDocument) -> ItemWriterResult {
        self.item_writes.set(self.item_writes.get() + 1);

        if self.rejected.contains(item.id.as_str()) {
            return Err(BatchError::ItemWriter(format!("document {} rejected", item.id)));
        }

        self.store(item)
    }
}

/// Writes `content` to a temporary CSV file kept alive by the returned handle.
pub fn csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary file");
    file.write_all(content.as_bytes()).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}
