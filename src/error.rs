use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    #[error("ItemProcessor from: {0}")]
    ItemProcessor(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),

    #[error("Error occurred in step {0}")]
    Step(String),

    #[error("Configuration: {0}")]
    Configuration(String),
}
