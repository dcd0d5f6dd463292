#[cfg(feature = "logger")]
/// This module provides a logger item writer, used for dry runs.
pub mod logger;

/// This module provides the CSV item reader of the fighter export.
pub mod csv;

#[cfg(feature = "json")]
/// This module provides a JSON item writer exporting documents to a file.
pub mod json;

#[cfg(feature = "mongodb")]
/// This module provides a MongoDB item writer storing documents by identity.
pub mod mongodb;
