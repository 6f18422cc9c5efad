//! Three-stage personal name extraction.
//!
//! 1. [`zones::ZoneDetector`] finds spans likely to hold a name (signatures,
//!    contact instructions, self-introductions).
//! 2. Candidates are pulled out of each zone by the entity recognizer or, when
//!    none is configured or it fails, by [`candidates::ZoneNamePatterns`].
//! 3. [`selector::select`] lets the LLM pick among the top candidates and falls
//!    back to the highest-confidence one.

pub mod candidates;
pub mod selector;
pub mod validator;
pub mod zones;

pub use validator::validate_name;

use crate::domain::model::{ExtractionResult, NameCandidate, ServiceOutcome, Zone};
use crate::domain::ports::{CompletionClient, EntityRecognizer};
use crate::utils::error::Result;
use candidates::{recognize_candidates, ZoneNamePatterns};
use serde::Serialize;
use std::sync::Arc;
use zones::ZoneDetector;

/// Bonus applied to the best candidate's confidence once a name is chosen.
const SELECTION_BONUS: f64 = 1.1;

/// Pipeline answer plus the intermediate stages, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameExtraction {
    pub name: String,
    pub confidence: f64,
    pub method: String,
    pub zones: Vec<Zone>,
    pub candidates: Vec<NameCandidate>,
    /// Number of person entities kept, or why recognition was skipped.
    pub entity_recognition: ServiceOutcome<usize>,
    pub selection: ServiceOutcome<String>,
}

impl NameExtraction {
    fn stopped(method: &str, zones: Vec<Zone>, entity_recognition: ServiceOutcome<usize>) -> Self {
        Self {
            name: String::new(),
            confidence: 0.0,
            method: method.to_string(),
            zones,
            candidates: Vec::new(),
            entity_recognition,
            selection: ServiceOutcome::NotFound,
        }
    }

    pub fn to_result(&self) -> ExtractionResult {
        if self.name.is_empty() {
            return ExtractionResult::empty(self.method.clone());
        }
        ExtractionResult::new(self.name.clone(), self.confidence, self.method.clone())
    }
}

pub struct NamePipeline {
    zones: ZoneDetector,
    patterns: ZoneNamePatterns,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
    llm: Option<Arc<dyn CompletionClient>>,
}

impl NamePipeline {
    pub fn new(
        recognizer: Option<Arc<dyn EntityRecognizer>>,
        llm: Option<Arc<dyn CompletionClient>>,
    ) -> Result<Self> {
        Ok(Self {
            zones: ZoneDetector::new()?,
            patterns: ZoneNamePatterns::new()?,
            recognizer,
            llm,
        })
    }

    pub async fn extract_name(&self, text: &str) -> NameExtraction {
        let zones = self.zones.detect(text);
        if zones.is_empty() {
            return NameExtraction::stopped(
                "no_zones",
                zones,
                ServiceOutcome::Unavailable("skipped: no zones".to_string()),
            );
        }
        tracing::debug!(count = zones.len(), "name zones detected");

        let (candidates, entity_recognition) = self.candidates(&zones).await;
        if candidates.is_empty() {
            return NameExtraction::stopped("no_candidates", zones, entity_recognition);
        }

        let selection = selector::select(self.llm.as_deref(), &candidates).await;
        // Confidence follows the best candidate even when the LLM picked another one.
        let (name, confidence, method) =
            match (&selection.name, selector::rank(&candidates).first()) {
                (Some(name), Some(best)) => (
                    name.clone(),
                    (best.confidence * SELECTION_BONUS).min(1.0),
                    format!("hybrid_{}", best.method.as_str()),
                ),
                _ => (String::new(), 0.0, "validation_failed".to_string()),
            };
        tracing::debug!(%name, confidence, %method, "name pipeline finished");

        NameExtraction {
            name,
            confidence,
            method,
            zones,
            candidates,
            entity_recognition,
            selection: selection.llm,
        }
    }

    async fn candidates(&self, zones: &[Zone]) -> (Vec<NameCandidate>, ServiceOutcome<usize>) {
        let Some(recognizer) = self.recognizer.as_deref() else {
            return (
                self.patterns.candidates(zones),
                ServiceOutcome::Unavailable("no entity recognizer configured".to_string()),
            );
        };

        match recognize_candidates(recognizer, zones).await {
            Ok(candidates) if candidates.is_empty() => (candidates, ServiceOutcome::NotFound),
            Ok(candidates) => {
                let count = candidates.len();
                (candidates, ServiceOutcome::Found(count))
            }
            Err(e) => {
                tracing::warn!("entity recognition failed, using zone patterns: {}", e);
                (
                    self.patterns.candidates(zones),
                    ServiceOutcome::Unavailable(e.to_string()),
                )
            }
        }
    }
}
