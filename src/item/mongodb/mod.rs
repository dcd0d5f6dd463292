/// This module contains the MongoDB writer used as the document store.
pub mod mongodb_writer;
