use anyhow::Result;
use async_trait::async_trait;
use rfq_extract::domain::ports::{CompletionRequest, RecognizedEntity};
use rfq_extract::sample::SAMPLE_RFQ;
use rfq_extract::{
    AggregateWeighting, CompletionClient, EntityRecognizer, ExtractError, RfqExtractor, ServiceOutcome,
};
use std::sync::Arc;

const SAMPLE_FIELDS: &str = r#"```json
{"origin": "Valencia, España", "destination": "Santos, Brasil", "commodity": "maquinaria pesada",
 "weight": "1900kg", "urgency": "urgent", "contact_name": "Juan Martinez"}
```"#;

/// Answers the field prompt with `fields` and the name prompt with `name`.
struct ScriptedLlm {
    fields: &'static str,
    name: &'static str,
}

#[async_trait]
impl CompletionClient for ScriptedLlm {
    async fn complete(&self, request: &CompletionRequest) -> rfq_extract::Result<String> {
        if request.prompt.contains("Answer with the JSON object only") {
            Ok(self.fields.to_string())
        } else {
            Ok(self.name.to_string())
        }
    }
}

struct DownLlm;

#[async_trait]
impl CompletionClient for DownLlm {
    async fn complete(&self, _request: &CompletionRequest) -> rfq_extract::Result<String> {
        Err(ExtractError::service("llm", "connection refused"))
    }
}

struct SignatureNer;

#[async_trait]
impl EntityRecognizer for SignatureNer {
    async fn recognize(&self, text: &str) -> rfq_extract::Result<Vec<RecognizedEntity>> {
        let mut entities = Vec::new();
        if text.contains("juan martinez") {
            entities.push(RecognizedEntity::new("juan martinez", "PER"));
        }
        if text.contains("Maquilogistics SL") {
            entities.push(RecognizedEntity::new("Maquilogistics SL", "ORG"));
        }
        Ok(entities)
    }
}

#[tokio::test]
async fn test_sample_rfq_with_services() -> Result<()> {
    let llm = Arc::new(ScriptedLlm {
        fields: SAMPLE_FIELDS,
        name: "Juan Martinez",
    });
    let extractor = RfqExtractor::new(Some(llm), Some(Arc::new(SignatureNer)), AggregateWeighting::CoreFields)?;

    let detailed = extractor.extract_detailed(SAMPLE_RFQ).await;
    let report = &detailed.report;

    assert_eq!(report.origin, "Valencia, España");
    assert_eq!(report.destination, "Santos, Brasil");
    assert_eq!(report.commodity, "Maquinaria pesada");
    assert_eq!(report.weight, "1900 kg");
    assert_eq!(report.urgency, "urgent");
    assert_eq!(report.contact_name, "Juan Martinez");
    assert_eq!(report.contact_info, "+34 666 123 456");
    assert!((report.extraction_confidence - 0.495 / 0.85).abs() < 1e-9);
    assert!(report.is_quotable());

    assert_eq!(detailed.fields.weight.method, "explicit_total");
    assert_eq!(detailed.fields.urgency.confidence, 0.95);
    assert_eq!(detailed.fields.contact_name.method, "hybrid_ner");
    assert_eq!(detailed.name_trace.selection, ServiceOutcome::Found("Juan Martinez".to_string()));
    assert!(matches!(detailed.name_trace.entity_recognition, ServiceOutcome::Found(_)));

    Ok(())
}

#[tokio::test]
async fn test_sample_rfq_offline() -> Result<()> {
    let extractor = RfqExtractor::offline()?;
    let detailed = extractor.extract_detailed(SAMPLE_RFQ).await;

    // Without the LLM the gazetteer answer is used for both directions.
    assert_eq!(detailed.report.origin, "Valencia, España");
    assert_eq!(detailed.report.destination, "Valencia, España");
    assert_eq!(detailed.report.weight, "1900 kg");
    assert_eq!(detailed.report.contact_name, "Juan Martinez");
    assert_eq!(detailed.fields.contact_name.method, "hybrid_zone_regex");
    assert!((detailed.fields.contact_name.confidence - 0.891).abs() < 1e-9);
    assert!(detailed.llm.is_unavailable());

    Ok(())
}

#[tokio::test]
async fn test_service_failures_degrade() -> Result<()> {
    let extractor = RfqExtractor::new(Some(Arc::new(DownLlm)), None, AggregateWeighting::CoreFields)?;
    let offline = RfqExtractor::offline()?;

    let degraded = extractor.extract_detailed(SAMPLE_RFQ).await;
    assert!(degraded.llm.is_unavailable());
    assert!(degraded.name_trace.selection.is_unavailable());
    // The best zone candidate clears the 0.5 floor, so the name survives.
    assert_eq!(degraded.report, offline.extract_all(SAMPLE_RFQ).await);

    Ok(())
}

#[tokio::test]
async fn test_identical_input_identical_output() -> Result<()> {
    let llm = Arc::new(ScriptedLlm {
        fields: SAMPLE_FIELDS,
        name: "NONE",
    });
    let extractor = RfqExtractor::new(Some(llm), None, AggregateWeighting::AllFields)?;

    let first = extractor.extract_all(SAMPLE_RFQ).await;
    let second = extractor.extract_all(SAMPLE_RFQ).await;
    assert_eq!(first, second);
    assert!(first.extraction_confidence <= 1.0);

    Ok(())
}

#[tokio::test]
async fn test_value_empty_iff_zero_confidence() -> Result<()> {
    let extractor = RfqExtractor::offline()?;
    let emails = [
        SAMPLE_RFQ,
        "",
        "hola, necesito precio",
        "envio de 5kg y 3kg a Lima. gracias",
        "Nombre: Laura Vidal\nTel: 600-111-222\n",
    ];

    for email in emails {
        let detailed = extractor.extract_detailed(email).await;
        let fields = &detailed.fields;
        for result in [
            &fields.origin,
            &fields.destination,
            &fields.commodity,
            &fields.weight,
            &fields.contact_name,
            &fields.contact_info,
        ] {
            assert_eq!(result.value.is_empty(), result.confidence == 0.0, "{:?}", result);
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_extractor_is_shareable_across_tasks() -> Result<()> {
    let extractor = Arc::new(RfqExtractor::offline()?);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let extractor = Arc::clone(&extractor);
            tokio::spawn(async move { extractor.extract_all(SAMPLE_RFQ).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await?.weight, "1900 kg");
    }

    Ok(())
}
