use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde::Deserialize;

use crate::BatchError;

/// Fighter statistics export read when `--csv` is not given.
pub const DEFAULT_CSV_PATH: &str = "oldData/FighterData.csv";
/// Fighter names read by the batch loader when `--names` is not given.
pub const DEFAULT_NAMES_PATH: &str = "oldData/FighterNames.csv";
pub const DEFAULT_COLLECTION: &str = "fighterData";
pub const DEFAULT_DATABASE: &str = "fightstats";
/// Rows per transaction of the batch loader.
pub const DEFAULT_BATCH_SIZE: usize = 500;
/// Rows between two progress reports of the simple loader.
pub const SIMPLE_PROGRESS_INTERVAL: usize = 10;
pub const DEFAULT_CREDENTIALS_PATH: &str = "fightstats-credentials.json";
pub const URI_ENV_VAR: &str = "MONGODB_URI";
pub const DATABASE_ENV_VAR: &str = "MONGODB_DATABASE";

/// Parses a `--batch-size` value, refusing zero.
pub fn parse_batch_size(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("batch size must be at least 1".to_string()),
        Ok(size) => Ok(size),
        Err(error) => Err(error.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct KeyFile {
    uri: String,
    #[serde(default)]
    database: Option<String>,
}

/// Where the connection settings were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    KeyFile(PathBuf),
    Environment,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::KeyFile(path) => write!(f, "key file {}", path.display()),
            CredentialSource::Environment => write!(f, "environment ({URI_ENV_VAR})"),
        }
    }
}

/// How to reach the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub uri: String,
    pub database: String,
    pub source: CredentialSource,
}

impl ConnectionSettings {
    /// Resolves the settings from the key file, then from the process
    /// environment.
    ///
    /// # Errors
    /// Returns `BatchError::Configuration` when neither source provides a URI.
    pub fn resolve<P: AsRef<Path>>(key_file: P) -> Result<Self, BatchError> {
        Self::resolve_from(key_file, |name| env::var(name).ok())
    }

    /// Same as [`ConnectionSettings::resolve`] with `lookup` standing in for
    /// the environment.
    ///
    /// A key file that is missing, unreadable or not valid JSON is skipped.
    /// Blank values count as unset.
    pub fn resolve_from<P, F>(key_file: P, lookup: F) -> Result<Self, BatchError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let key_file = key_file.as_ref();

        if let Some(settings) = Self::from_key_file(key_file) {
            info!("Using connection settings from {}", settings.source);
            return Ok(settings);
        }

        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        match lookup(URI_ENV_VAR) {
            Some(uri) => {
                let settings = Self {
                    uri,
                    database: lookup(DATABASE_ENV_VAR)
                        .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                    source: CredentialSource::Environment,
                };
                info!("Using connection settings from {}", settings.source);
                Ok(settings)
            }
            None => Err(BatchError::Configuration(format!(
                "no connection settings: neither {} nor {} provides a database URI",
                key_file.display(),
                URI_ENV_VAR
            ))),
        }
    }

    fn from_key_file(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) => {
                info!("No key file at {} ({})", path.display(), error);
                return None;
            }
        };

        let key_file = match serde_json::from_str::<KeyFile>(&content) {
            Ok(key_file) => key_file,
            Err(error) => {
                warn!("Ignoring invalid key file {}: {}", path.display(), error);
                return None;
            }
        };

        if key_file.uri.trim().is_empty() {
            warn!("Ignoring key file {}: empty uri", path.display());
            return None;
        }

        Some(Self {
            uri: key_file.uri,
            database: key_file
                .database
                .filter(|database| !database.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            source: CredentialSource::KeyFile(path.to_path_buf()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, fs};

    use tempfile::tempdir;

    use crate::BatchError;

    use super::{parse_batch_size, ConnectionSettings, CredentialSource, DEFAULT_DATABASE};

    #[test]
    fn batch_size_must_be_a_positive_integer() {
        assert_eq!(parse_batch_size("500"), Ok(500));
        assert_eq!(parse_batch_size("1"), Ok(1));
        assert!(parse_batch_size("0").is_err());
        assert!(parse_batch_size("-3").is_err());
        assert!(parse_batch_size("ten").is_err());
    }

    fn environment(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn key_file_wins_over_environment() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{"uri": "mongodb://keyfile:27017", "database": "stats"}"#)?;

        let settings = ConnectionSettings::resolve_from(
            &path,
            environment(&[("MONGODB_URI", "mongodb://env:27017")]),
        )?;

        assert_eq!(settings.uri, "mongodb://keyfile:27017");
        assert_eq!(settings.database, "stats");
        assert_eq!(settings.source, CredentialSource::KeyFile(path));
        Ok(())
    }

    #[test]
    fn key_file_database_defaults() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{"uri": "mongodb://keyfile:27017"}"#)?;

        let settings = ConnectionSettings::resolve_from(&path, environment(&[]))?;

        assert_eq!(settings.database, DEFAULT_DATABASE);
        Ok(())
    }

    #[test]
    fn falls_back_to_environment() -> anyhow::Result<()> {
        let dir = tempdir()?;

        let settings = ConnectionSettings::resolve_from(
            dir.path().join("missing.json"),
            environment(&[
                ("MONGODB_URI", "mongodb://env:27017"),
                ("MONGODB_DATABASE", "archive"),
            ]),
        )?;

        assert_eq!(settings.uri, "mongodb://env:27017");
        assert_eq!(settings.database, "archive");
        assert_eq!(settings.source, CredentialSource::Environment);
        Ok(())
    }

    #[test]
    fn invalid_key_file_falls_through() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json")?;

        let settings = ConnectionSettings::resolve_from(
            &path,
            environment(&[("MONGODB_URI", "mongodb://env:27017")]),
        )?;

        assert_eq!(settings.source, CredentialSource::Environment);
        assert_eq!(settings.database, DEFAULT_DATABASE);
        Ok(())
    }

    #[test]
    fn nothing_configured_is_a_configuration_error() -> anyhow::Result<()> {
        let dir = tempdir()?;

        let result = ConnectionSettings::resolve_from(
            dir.path().join("missing.json"),
            environment(&[("MONGODB_URI", "  ")]),
        );

        assert!(matches!(result, Err(BatchError::Configuration(_))));
        Ok(())
    }
}
