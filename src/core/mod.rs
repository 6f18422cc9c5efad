pub mod arbitration;
pub mod commodity;
pub mod contact;
pub mod extractor;
pub mod llm_fields;
pub mod location;
pub mod name;
pub mod urgency;
pub mod weight;

pub use arbitration::AggregateWeighting;
pub use extractor::{DetailedExtraction, RfqExtractor};
pub use crate::utils::error::Result;
