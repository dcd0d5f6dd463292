use std::fmt::Debug;

use log::info;

use crate::{core::item::ItemWriter, BatchError};

/// Writer that only logs what it receives.
///
/// Backs the dry run: every document the processor produced is printed and
/// counted as written, and nothing reaches a store.
#[derive(Default)]
pub struct LoggerWriter {}

impl<T> ItemWriter<T> for LoggerWriter
where
    T: Debug,
{
    fn write(&self, items: &[T]) -> Result<(), BatchError> {
        items.iter().for_each(|item| info!("[dry-run] {:?}", item));
        Ok(())
    }
}
