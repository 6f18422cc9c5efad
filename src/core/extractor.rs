use crate::core::arbitration::{aggregate_confidence, contact_info_value, merge_field, AggregateWeighting};
use crate::core::commodity::CommodityClassifier;
use crate::core::contact::ContactExtractor;
use crate::core::llm_fields::LlmFieldExtractor;
use crate::core::location::LocationResolver;
use crate::core::name::NameExtraction;
use crate::core::urgency::classify_urgency;
use crate::core::weight::WeightParser;
use crate::domain::model::{ExtractionReport, Field, FieldResults, ServiceOutcome};
use crate::domain::ports::{CompletionClient, EntityRecognizer};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Report plus everything that went into it.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedExtraction {
    pub report: ExtractionReport,
    pub fields: FieldResults,
    pub llm: ServiceOutcome<HashMap<String, String>>,
    pub name_trace: NameExtraction,
}

/// Runs every field strategy on an email and arbitrates the answers.
///
/// Pattern tables are compiled once in [`RfqExtractor::new`]; extraction
/// itself never fails; service errors only empty the affected source.
pub struct RfqExtractor {
    locations: LocationResolver,
    commodities: CommodityClassifier,
    weights: WeightParser,
    contacts: ContactExtractor,
    llm_fields: LlmFieldExtractor,
    weighting: AggregateWeighting,
}

impl RfqExtractor {
    pub fn new(
        llm: Option<Arc<dyn CompletionClient>>,
        recognizer: Option<Arc<dyn EntityRecognizer>>,
        weighting: AggregateWeighting,
    ) -> Result<Self> {
        Ok(Self {
            locations: LocationResolver::new()?,
            commodities: CommodityClassifier::new()?,
            weights: WeightParser::new()?,
            contacts: ContactExtractor::new(recognizer, llm.clone())?,
            llm_fields: LlmFieldExtractor::new(llm),
            weighting,
        })
    }

    /// Extractor with no external services: pattern tables only.
    pub fn offline() -> Result<Self> {
        Self::new(None, None, AggregateWeighting::default())
    }

    pub async fn extract_all(&self, text: &str) -> ExtractionReport {
        self.extract_detailed(text).await.report
    }

    pub async fn extract_detailed(&self, text: &str) -> DetailedExtraction {
        let llm = self.llm_fields.extract_via_llm(text).await;
        let contact = self.contacts.extract_contact_detailed(text).await;

        let fields = FieldResults {
            origin: self.locations.resolve(text, false),
            destination: self.locations.resolve(text, true),
            commodity: self.commodities.classify(text),
            weight: self.weights.parse_weight(text),
            urgency: classify_urgency(text),
            contact_name: contact.name,
            contact_info: contact.contact,
        };

        let report = self.arbitrate(&fields, llm.as_found());
        tracing::info!(
            confidence = report.extraction_confidence,
            quotable = report.is_quotable(),
            "📊 RFQ extraction finished"
        );

        DetailedExtraction {
            report,
            fields,
            llm,
            name_trace: contact.pipeline,
        }
    }

    fn arbitrate(&self, fields: &FieldResults, llm: Option<&HashMap<String, String>>) -> ExtractionReport {
        let mut report = ExtractionReport::default();

        for field in Field::ARBITRATED {
            let specialized = fields.get(field);
            let llm_value = llm.and_then(|answers| answers.get(field.key())).map(String::as_str);
            let value = merge_field(llm_value, specialized);
            tracing::debug!(
                field = field.key(),
                method = %specialized.method,
                specialized = specialized.confidence,
                %value,
                "field arbitrated"
            );
            report.set(field, value);
        }

        report.contact_info = contact_info_value(&fields.contact_info);
        report.extraction_confidence =
            aggregate_confidence(self.weighting, |field| fields.get(field).confidence);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CompletionRequest;
    use async_trait::async_trait;

    struct FieldsOnly(&'static str);

    #[async_trait]
    impl CompletionClient for FieldsOnly {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            if request.max_tokens == 500 {
                Ok(self.0.to_string())
            } else {
                Ok("NONE".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_offline_extraction() {
        let extractor = RfqExtractor::offline().unwrap();
        let report = extractor
            .extract_all("envio desde valencia a santos de 890kg y 950kg, muy urgente")
            .await;
        assert_eq!(report.origin, "Valencia, España");
        assert_eq!(report.destination, "Valencia, España");
        assert_eq!(report.weight, "950 kg");
        assert_eq!(report.urgency, "urgent");
        assert_eq!(report.commodity, "");
        assert_eq!(report.contact_info, "");
    }

    #[tokio::test]
    async fn test_llm_fills_weak_fields_only() {
        let llm = Arc::new(FieldsOnly(
            r#"{"origin": "Bilbao, España", "destination": "Santos, Brasil", "commodity": "Textiles", "weight": "10 kg", "urgency": "normal"}"#,
        ));
        let extractor = RfqExtractor::new(Some(llm), None, AggregateWeighting::CoreFields).unwrap();
        let detailed = extractor
            .extract_detailed("envio desde valencia a santos de 890kg y 950kg, muy urgente")
            .await;

        // 0.4 from the gazetteer loses to the LLM, 0.8 and 0.95 do not.
        assert_eq!(detailed.report.origin, "Bilbao, España");
        assert_eq!(detailed.report.destination, "Santos, Brasil");
        assert_eq!(detailed.report.commodity, "Textiles");
        assert_eq!(detailed.report.weight, "950 kg");
        assert_eq!(detailed.report.urgency, "urgent");
        assert_eq!(detailed.fields.weight.method, "largest_weight");
        assert!(matches!(detailed.llm, ServiceOutcome::Found(_)));
    }

    #[tokio::test]
    async fn test_empty_email() {
        let report = RfqExtractor::offline().unwrap().extract_all("").await;
        assert_eq!(report.urgency, "normal");
        assert_eq!(report.origin, "");
        assert_eq!(report.extraction_confidence, 0.0);
    }
}
