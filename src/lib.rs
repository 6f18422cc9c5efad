pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod sample;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::TomlConfig;
pub use core::{AggregateWeighting, DetailedExtraction, RfqExtractor};
pub use domain::model::{ExtractionReport, ExtractionResult, ServiceOutcome};
pub use domain::ports::{CompletionClient, EntityRecognizer};
pub use utils::error::{ExtractError, Result};
