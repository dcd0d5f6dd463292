use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::{core::item::ItemWriter, BatchError};

/// Writes items as the elements of one JSON array.
///
/// `open` starts the array and `close` ends it. Each chunk is serialized in
/// full before anything reaches the stream, so an item that cannot be
/// serialized rejects its whole chunk without leaving half of it behind.
pub struct JsonItemWriter<W: Write> {
    stream: RefCell<BufWriter<W>>,
    use_pretty_formatter: bool,
    is_first_item: Cell<bool>,
}

impl<W: Write> JsonItemWriter<W> {
    fn new(wtr: W, use_pretty_formatter: bool) -> Self {
        Self {
            stream: RefCell::new(BufWriter::new(wtr)),
            use_pretty_formatter,
            is_first_item: Cell::new(true),
        }
    }

    /// Flushes the buffer and gives back the underlying writer.
    pub fn into_inner(self) -> Result<W, BatchError> {
        self.stream
            .into_inner()
            .into_inner()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }

    fn serialize<T: Serialize>(&self, item: &T) -> Result<Vec<u8>, BatchError> {
        let result = if self.use_pretty_formatter {
            serde_json::to_vec_pretty(item)
        } else {
            serde_json::to_vec(item)
        };

        result.map_err(|error| BatchError::ItemWriter(error.to_string()))
    }

    fn separator(&self) -> &'static [u8] {
        if self.use_pretty_formatter {
            b",\n"
        } else {
            b","
        }
    }

    fn write_all(&self, bytes: &[u8]) -> Result<(), BatchError> {
        self.stream
            .borrow_mut()
            .write_all(bytes)
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }
}

impl<T: Serialize, W: Write> ItemWriter<T> for JsonItemWriter<W> {
    fn write(&self, items: &[T]) -> Result<(), BatchError> {
        let mut buffer = Vec::new();
        let mut is_first_item = self.is_first_item.get();

        for item in items {
            if !is_first_item {
                buffer.extend_from_slice(self.separator());
            }
            buffer.extend(self.serialize(item)?);
            is_first_item = false;
        }

        self.write_all(&buffer)?;
        self.is_first_item.set(is_first_item);
        Ok(())
    }

    fn flush(&self) -> Result<(), BatchError> {
        self.stream
            .borrow_mut()
            .flush()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }

    fn open(&self) -> Result<(), BatchError> {
        if self.use_pretty_formatter {
            self.write_all(b"[\n")
        } else {
            self.write_all(b"[")
        }
    }

    fn close(&self) -> Result<(), BatchError> {
        if self.use_pretty_formatter {
            self.write_all(b"\n]\n")?;
        } else {
            self.write_all(b"]\n")?;
        }
        ItemWriter::<T>::flush(self)
    }
}

#[derive(Default)]
pub struct JsonItemWriterBuilder {
    pretty_formatter: bool,
}

impl JsonItemWriterBuilder {
    pub fn new() -> Self {
        Self {
            pretty_formatter: false,
        }
    }

    /// Indents each document over several lines.
    pub fn pretty_formatter(mut self, yes: bool) -> Self {
        self.pretty_formatter = yes;
        self
    }

    pub fn from_writer<W: Write>(self, wtr: W) -> JsonItemWriter<W> {
        JsonItemWriter::new(wtr, self.pretty_formatter)
    }

    /// Creates the file at `path`, replacing any previous export.
    ///
    /// # Errors
    /// Returns `BatchError::ItemWriter` if the file cannot be created.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<JsonItemWriter<File>, BatchError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|error| {
            BatchError::ItemWriter(format!("JSON file {}: {}", path.display(), error))
        })?;
        Ok(self.from_writer(file))
    }
}
