use crate::core::name::{validate_name, NameExtraction, NamePipeline};
use crate::domain::model::ExtractionResult;
use crate::domain::ports::{CompletionClient, EntityRecognizer};
use crate::utils::error::Result;
use crate::utils::text::compile_rows;
use regex::Regex;
use std::sync::Arc;

/// Whole-text name patterns tried when the name pipeline comes back empty.
/// Keyword anchors ignore case; the bare name shapes rely on capitalization.
const FALLBACK_NAME_PATTERNS: &[(&str, f64)] = &[
    (r"(?im)saludos[,\s]*([^\n\r]+?)(?:\s*whatsapp|\s*tel|\s*$|\n)", 0.9),
    (r"(?im)atentamente[,\s]*([^\n\r]+?)(?:\s*whatsapp|\s*tel|\s*$|\n)", 0.9),
    (r"(?im)gracias[,\s]*([^\n\r]+?)(?:\s*whatsapp|\s*tel|\s*$|\n)", 0.85),
    (
        r"([A-ZÁÉÍÓÚÑ][a-záéíóúñ]+[ \t]+[A-ZÁÉÍÓÚÑ][a-záéíóúñ]+)(?:\s+(?i:whatsapp|tel)|[ \t]*\n)",
        0.8,
    ),
    (
        r"(?i:nombre)[:\s]*([A-ZÁÉÍÓÚÑ][a-záéíóúñ \t]+?)(?:\s*(?i:whatsapp|tel)|[ \t]*\n)",
        0.8,
    ),
    (
        r"(?i:contacto)[:\s]*([A-ZÁÉÍÓÚÑ][a-záéíóúñ \t]+?)(?:\s*(?i:whatsapp|tel)|[ \t]*\n)",
        0.8,
    ),
    (r"\b([A-ZÁÉÍÓÚÑ][a-záéíóúñ]+[ \t]+[A-ZÁÉÍÓÚÑ][a-záéíóúñ]+)\b", 0.6),
    (r"\b([A-ZÁÉÍÓÚÑ]{2,}[ \t]+[A-ZÁÉÍÓÚÑ]{2,})\b", 0.5),
];

/// Contact handles, most specific first.
const HANDLE_PATTERNS: &[(&str, f64)] = &[
    (r"(\+\d{1,3}\s+\d{3}\s+\d{3}\s+\d{3})", 0.9),
    (r"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})", 0.9),
    (r"WhatsApp[:\s]*(\+?\d[\d\s]+)", 0.85),
    (r"Tel[:\s]*(\+?\d[\d\s\-]+)", 0.8),
];

#[derive(Debug, Clone)]
pub struct ContactExtraction {
    pub name: ExtractionResult,
    pub contact: ExtractionResult,
    /// Trace of the name pipeline, kept even when the fallback produced the name.
    pub pipeline: NameExtraction,
}

pub struct ContactExtractor {
    names: NamePipeline,
    fallback_names: Vec<(Regex, f64)>,
    handles: Vec<(Regex, f64)>,
}

impl ContactExtractor {
    pub fn new(
        recognizer: Option<Arc<dyn EntityRecognizer>>,
        llm: Option<Arc<dyn CompletionClient>>,
    ) -> Result<Self> {
        Ok(Self {
            names: NamePipeline::new(recognizer, llm)?,
            fallback_names: compile_rows(FALLBACK_NAME_PATTERNS.iter().copied())?,
            handles: compile_rows(HANDLE_PATTERNS.iter().copied())?,
        })
    }

    /// Returns `(contact name, contact handle)`.
    pub async fn extract_contact(&self, text: &str) -> (ExtractionResult, ExtractionResult) {
        let extraction = self.extract_contact_detailed(text).await;
        (extraction.name, extraction.contact)
    }

    pub async fn extract_contact_detailed(&self, text: &str) -> ContactExtraction {
        let pipeline = self.names.extract_name(text).await;
        let mut name = pipeline.to_result();
        if !name.is_found() {
            tracing::debug!(method = %pipeline.method, "name pipeline empty, trying fallback patterns");
            name = self.fallback_name(text);
        }

        ContactExtraction {
            name,
            contact: self.contact_handle(text),
            pipeline,
        }
    }

    fn fallback_name(&self, text: &str) -> ExtractionResult {
        self.fallback_names
            .iter()
            .find_map(|(pattern, confidence)| {
                let caps = pattern.captures(text)?;
                let name = validate_name(caps[1].trim())?;
                Some(ExtractionResult::new(name, *confidence, "fallback_regex").with_raw_match(&caps[0]))
            })
            .unwrap_or_else(|| ExtractionResult::empty("no_name_found"))
    }

    pub fn contact_handle(&self, text: &str) -> ExtractionResult {
        self.handles
            .iter()
            .find_map(|(pattern, confidence)| {
                let caps = pattern.captures(text)?;
                Some(ExtractionResult::new(caps[1].trim(), *confidence, "regex_pattern"))
            })
            .unwrap_or_else(|| ExtractionResult::empty("none"))
    }
}
