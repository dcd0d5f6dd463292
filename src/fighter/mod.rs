//! Fighter statistics: how a row of the CSV export becomes a document.
//!
//! - [`value`] coerces CSV text into integers, floats or text.
//! - [`record`] holds the raw and typed rows and the resulting document.
//! - [`category`] is the fixed grouping of statistic columns.
//! - [`names`] maps fighter codes to display names.
//! - [`processor`] ties them together as an `ItemProcessor`.

pub mod category;

pub mod names;

pub mod processor;

pub mod record;

pub mod value;
