// Adapters layer: reqwest-backed implementations of the domain ports.

pub mod ner;
pub mod openai;

pub use ner::HttpEntityRecognizer;
pub use openai::OpenAiCompletionClient;
