use clap::Parser;
use rfq_extract::sample::SAMPLE_RFQ;
use rfq_extract::utils::{logger, validation::Validate};
use rfq_extract::{CliConfig, ExtractError, RfqExtractor, TomlConfig};
use std::io::Read;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting rfq-extract");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            TomlConfig::from_file(path).unwrap_or_else(|e| fail(&e))
        }
        None => TomlConfig::default(),
    };

    if cli.no_llm {
        config.llm.enabled = false;
    }
    if cli.no_ner {
        config.ner.enabled = false;
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let llm = config.completion_client();
    let recognizer = config.entity_recognizer();
    tracing::info!(
        llm = llm.is_some(),
        model = %config.llm.model,
        ner = recognizer.is_some(),
        weighting = ?config.arbitration.weighting,
        "🔧 Extractor configured"
    );

    let extractor = RfqExtractor::new(llm, recognizer, config.arbitration.weighting)
        .unwrap_or_else(|e| fail(&e));
    let email = read_email(&cli).unwrap_or_else(|e| fail(&e));

    let output = if cli.detailed {
        serde_json::to_value(extractor.extract_detailed(&email).await)?
    } else {
        serde_json::to_value(extractor.extract_all(&email).await)?
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    Ok(())
}

fn read_email(cli: &CliConfig) -> Result<String, ExtractError> {
    if cli.sample {
        return Ok(SAMPLE_RFQ.to_string());
    }

    match &cli.input {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut email = String::new();
            std::io::stdin().read_to_string(&mut email)?;
            Ok(email)
        }
    }
}

fn fail(e: &ExtractError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(1);
}
