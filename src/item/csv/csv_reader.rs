use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Terminator, Trim};
use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::Read,
    path::Path,
};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
    fighter::record::RawRow,
};

/// A CSV item reader that yields each data row as a [`RawRow`].
///
/// The first line holds the column names. Every following line is paired
/// with those names, in column order:
///
/// - a line shorter than the header leaves the missing columns out;
/// - values beyond the last header are dropped;
/// - values are kept verbatim unless trimming is configured.
///
/// Rows are numbered from 1 in the order they are read.
///
/// # Examples
///
/// ```
/// use fightstats_loader::item::csv::csv_reader::CsvItemReaderBuilder;
/// use fightstats_loader::core::item::ItemReader;
///
/// let data = "\
/// fighterCode,Wins
/// F1,10
/// F2
/// ";
///
/// let reader = CsvItemReaderBuilder::new()
///     .from_reader(data.as_bytes())
///     .unwrap();
///
/// let first = reader.read().unwrap().unwrap();
/// assert_eq!(first.position(), 1);
/// assert_eq!(first.get("Wins"), Some("10"));
///
/// let second = reader.read().unwrap().unwrap();
/// assert_eq!(second.position(), 2);
/// assert_eq!(second.get("Wins"), None);
///
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct CsvItemReader<R> {
    headers: StringRecord,
    /// Iterator over the CSV records
    ///
    /// Uses `RefCell` to provide interior mutability so we can iterate
    /// through records while keeping the `read` method signature compatible
    /// with the `ItemReader` trait.
    records: RefCell<StringRecordsIntoIter<R>>,
    position: Cell<usize>,
}

impl<R: Read> CsvItemReader<R> {
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }
}

impl<R: Read> ItemReader<RawRow> for CsvItemReader<R> {
    /// Reads the next row.
    ///
    /// # Returns
    /// - `Ok(Some(row))` if a row is successfully read
    /// - `Ok(None)` if there are no more rows to read
    /// - `Err(BatchError::ItemReader(error))` if the CSV is malformed or unreadable
    fn read(&self) -> ItemReaderResult<RawRow> {
        match self.records.borrow_mut().next() {
            Some(Ok(record)) => {
                let position = self.position.get() + 1;
                self.position.set(position);

                let fields = self
                    .headers
                    .iter()
                    .zip(record.iter())
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect();

                Ok(Some(RawRow::new(position, fields)))
            }
            Some(Err(error)) => Err(BatchError::ItemReader(error.to_string())),
            None => Ok(None),
        }
    }
}

/// A builder for configuring CSV item reading.
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Terminator: CRLF, which also accepts plain LF line endings
/// - Trimming: none, values are kept as written
/// - Flexible record lengths
pub struct CsvItemReaderBuilder {
    /// The delimiter character (default: comma ',')
    delimiter: u8,
    /// The line terminator (default: CRLF)
    terminator: Terminator,
    /// Whitespace trimming applied to headers and values (default: none)
    trim: Trim,
}

impl Default for CsvItemReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemReaderBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            terminator: Terminator::CRLF,
            trim: Trim::None,
        }
    }

    /// Sets the delimiter character for the CSV parsing.
    ///
    /// # Examples
    ///
    /// ```
    /// use fightstats_loader::item::csv::csv_reader::CsvItemReaderBuilder;
    ///
    /// let builder = CsvItemReaderBuilder::new()
    ///     .delimiter(b';');
    /// ```
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the line terminator for the CSV parsing.
    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Sets which parts of each record get their surrounding whitespace trimmed.
    pub fn trim(mut self, trim: Trim) -> Self {
        self.trim = trim;
        self
    }

    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .trim(self.trim)
            .delimiter(self.delimiter)
            .terminator(self.terminator)
            .has_headers(true)
            .flexible(true);
        builder
    }

    /// Creates a `CsvItemReader` from any source implementing `Read`.
    ///
    /// # Errors
    /// Returns `BatchError::ItemReader` if the header line cannot be read.
    pub fn from_reader<R: Read>(self, rdr: R) -> Result<CsvItemReader<R>, BatchError> {
        let rdr = self.reader_builder().from_reader(rdr);
        Self::build(rdr)
    }

    /// Creates a `CsvItemReader` from a file path.
    ///
    /// # Errors
    /// Returns `BatchError::ItemReader` if the file cannot be opened or its
    /// header line cannot be read.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemReader<File>, BatchError> {
        let path = path.as_ref();
        let rdr = self.reader_builder().from_path(path).map_err(|error| {
            BatchError::ItemReader(format!("CSV file {}: {}", path.display(), error))
        })?;
        Self::build(rdr)
    }

    fn build<R: Read>(mut rdr: csv::Reader<R>) -> Result<CsvItemReader<R>, BatchError> {
        let headers = rdr
            .headers()
            .map_err(|error| BatchError::ItemReader(error.to_string()))?
            .clone();

        Ok(CsvItemReader {
            headers,
            records: RefCell::new(rdr.into_records()),
            position: Cell::new(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{env::temp_dir, error::Error};

    use csv::Trim;

    use crate::{core::item::ItemReader, error::BatchError, fighter::record::RawRow};

    use super::CsvItemReaderBuilder;

    fn read_all<R: std::io::Read>(
        reader: &super::CsvItemReader<R>,
    ) -> Result<Vec<RawRow>, BatchError> {
        let mut rows = Vec::new();
        while let Some(row) = reader.read()? {
            rows.push(row);
        }
        Ok(rows)
    }

    #[test]
    fn numbers_rows_and_pairs_them_with_headers() -> Result<(), Box<dyn Error>> {
        let data = "_id,fighterCode,Wins
42,F1,10
,F2,
,,3";

        let reader = CsvItemReaderBuilder::new().from_reader(data.as_bytes())?;
        let rows = read_all(&reader)?;

        assert_eq!(reader.headers().len(), 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].position(), 1);
        assert_eq!(rows[0].get("_id"), Some("42"));
        assert_eq!(rows[1].get("Wins"), Some(""));
        assert_eq!(rows[2].position(), 3);
        assert_eq!(rows[2].get("Wins"), Some("3"));
        Ok(())
    }

    #[test]
    fn tolerates_short_and_long_lines() -> Result<(), Box<dyn Error>> {
        let data = "a,b\n1\n2,3,4\n";

        let reader = CsvItemReaderBuilder::new().from_reader(data.as_bytes())?;
        let rows = read_all(&reader)?;

        assert_eq!(rows[0].fields().count(), 1);
        assert_eq!(rows[0].get("b"), None);
        assert_eq!(rows[1].fields().count(), 2);
        assert_eq!(rows[1].get("b"), Some("3"));
        Ok(())
    }

    #[test]
    fn keeps_values_verbatim_unless_trimming() -> Result<(), Box<dyn Error>> {
        let data = "name ,stance\n Jon , Orthodox";

        let verbatim = CsvItemReaderBuilder::new().from_reader(data.as_bytes())?;
        let row = verbatim.read()?.unwrap();
        assert_eq!(row.get("name "), Some(" Jon "));

        let trimmed = CsvItemReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(data.as_bytes())?;
        let row = trimmed.read()?.unwrap();
        assert_eq!(row.get("name"), Some("Jon"));
        Ok(())
    }

    #[test]
    fn missing_file_is_a_reader_error() {
        let result = CsvItemReaderBuilder::new().from_path(temp_dir().join("no-such-fighter-data.csv"));

        assert!(matches!(result, Err(BatchError::ItemReader(message)) if message.contains("no-such-fighter-data.csv")));
    }

    #[test]
    fn invalid_utf8_is_a_reader_error() -> Result<(), Box<dyn Error>> {
        let data: &[u8] = b"name\n\xff\xfe\n";

        let reader = CsvItemReaderBuilder::new().from_reader(data)?;

        assert!(matches!(reader.read(), Err(BatchError::ItemReader(_))));
        Ok(())
    }
}
