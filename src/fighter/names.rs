use std::{collections::HashMap, fs::File, io::Read, path::Path};

use csv::ReaderBuilder;
use log::{error, info, warn};
use serde::Deserialize;

use crate::BatchError;

#[derive(Debug, Deserialize)]
struct NameRecord {
    #[serde(rename = "fighterCode", default)]
    code: Option<String>,
    #[serde(rename = "fighterName", default)]
    name: Option<String>,
}

/// Display names of fighters keyed by `fighterCode`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex {
    names: HashMap<String, String>,
}

impl NameIndex {
    /// Loads the index from a CSV file with `fighterCode` and `fighterName`
    /// columns.
    ///
    /// The file is optional: when it does not exist the index is empty and
    /// documents simply go without a `fighterName`. A read error halfway
    /// through keeps the names loaded so far.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut index = Self::default();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(error) => {
                warn!("Fighter names CSV not found: {} ({})", path.display(), error);
                return index;
            }
        };

        if let Err(error) = index.extend_from_reader(file) {
            error!("Error loading fighter names: {}", error);
        }

        info!(
            "Loaded {} fighter names from {}",
            index.len(),
            path.display()
        );
        index
    }

    /// Builds an index from CSV data, failing on the first malformed record.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, BatchError> {
        let mut index = Self::default();
        index.extend_from_reader(rdr)?;
        Ok(index)
    }

    fn extend_from_reader<R: Read>(&mut self, rdr: R) -> Result<(), BatchError> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(rdr);

        for result in reader.deserialize::<NameRecord>() {
            let record = result.map_err(|error| BatchError::ItemReader(error.to_string()))?;

            let code = record.code.as_deref().unwrap_or_default().trim();
            let name = record.name.as_deref().unwrap_or_default().trim();

            if !code.is_empty() && !name.is_empty() {
                self.names.insert(code.to_string(), name.to_string());
            }
        }

        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NameIndex {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(code, name)| (code.into(), name.into()))
                .collect(),
        }
    }
}
