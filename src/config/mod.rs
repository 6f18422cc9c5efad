pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "rfq-extract")]
#[command(about = "Extract freight quotation fields from RFQ emails")]
pub struct CliConfig {
    /// Email body to read; stdin when omitted
    pub input: Option<PathBuf>,

    #[arg(long, short, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, conflicts_with = "input", help = "Use the bundled sample RFQ")]
    pub sample: bool,

    #[arg(long, help = "Print per-field results and the name pipeline trace")]
    pub detailed: bool,

    #[arg(long, help = "Disable the LLM even when configured")]
    pub no_llm: bool,

    #[arg(long, help = "Disable the entity recognizer even when configured")]
    pub no_ner: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Pretty-print the JSON output")]
    pub pretty: bool,
}
