use super::validator::validate_name;
use crate::domain::model::{CandidateMethod, NameCandidate, Zone};
use crate::domain::ports::EntityRecognizer;
use crate::utils::error::Result;
use crate::utils::text::compile_rows;
use regex::Regex;

/// Person spans found by entity recognition inside a zone score this fraction
/// of the zone confidence.
const NER_ZONE_FACTOR: f64 = 0.9;

/// One to four name words on a single line.
const NAME: &str = r"[A-ZÁÉÍÓÚÑÜ][a-záéíóúñü]+(?:[ \t]+[A-ZÁÉÍÓÚÑÜ][a-záéíóúñü]+){1,3}";
const CAPITALIZED_PAIR: &str = r"[A-ZÁÉÍÓÚÑÜ][a-záéíóúñü]+[ \t]+[A-ZÁÉÍÓÚÑÜ][a-záéíóúñü]+";

fn zone_name_patterns() -> Vec<(String, f64)> {
    vec![
        // Signature lines are often written in lower case, so the name shape is case-insensitive.
        (format!(r"(?i)(?:saludos|atentamente|gracias|cordialmente)[,\s]*({NAME})"), 0.9),
        (format!(r"(?i:contacto?)[:\s]+({NAME})"), 0.8),
        (format!(r"(?i:favor\s+de\s+contactar)\s+(?:a\s+)?({NAME})"), 0.8),
        (format!(r"(?i:comunicarse\s+con)\s+({NAME})"), 0.8),
        (format!(r"(?i:soy|me\s+llamo|mi\s+nombre\s+es)\s+({NAME})"), 0.8),
        (format!(r"(?i)({NAME})\s*(?:whatsapp|tel|email|phone|\+\d)"), 0.7),
        (format!(r"\b({CAPITALIZED_PAIR})\b"), 0.5),
    ]
}

/// Regex cascade used inside zones when no entity recognizer is available.
pub struct ZoneNamePatterns {
    patterns: Vec<(Regex, f64)>,
}

impl ZoneNamePatterns {
    pub fn new() -> Result<Self> {
        let table = zone_name_patterns();
        let rows = table.iter().map(|(pattern, confidence)| (pattern.as_str(), *confidence));
        Ok(Self {
            patterns: compile_rows(rows)?,
        })
    }

    pub fn candidates(&self, zones: &[Zone]) -> Vec<NameCandidate> {
        let mut candidates = Vec::new();

        for zone in zones {
            for (pattern, pattern_confidence) in &self.patterns {
                for caps in pattern.captures_iter(&zone.text) {
                    let Some(name) = validate_name(&caps[1]) else {
                        continue;
                    };
                    candidates.push(NameCandidate {
                        text: name,
                        confidence: zone.confidence * pattern_confidence,
                        method: CandidateMethod::ZoneRegex,
                        zone_type: zone.zone_type,
                        context: zone.text.clone(),
                    });
                }
            }
        }

        candidates
    }
}

/// Runs entity recognition on every zone and keeps valid person names.
/// Any recognizer error aborts the whole stage so the caller can fall back.
pub async fn recognize_candidates(
    recognizer: &dyn EntityRecognizer,
    zones: &[Zone],
) -> Result<Vec<NameCandidate>> {
    let mut candidates = Vec::new();

    for zone in zones {
        let entities = recognizer.recognize(&zone.text).await?;
        for entity in entities.iter().filter(|e| e.is_person()) {
            let Some(name) = validate_name(entity.text.trim()) else {
                tracing::debug!(text = %entity.text, "person entity rejected by name validator");
                continue;
            };
            candidates.push(NameCandidate {
                text: name,
                confidence: zone.confidence * NER_ZONE_FACTOR,
                method: CandidateMethod::Ner,
                zone_type: zone.zone_type,
                context: zone.text.clone(),
            });
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::RecognizedEntity;
    use crate::utils::error::ExtractError;
    use async_trait::async_trait;

    fn zone(text: &str, zone_type: &'static str, confidence: f64) -> Zone {
        Zone {
            text: text.to_string(),
            zone_type,
            confidence,
            start: 0,
            end: text.len(),
        }
    }

    #[test]
    fn test_greeting_prefixed_lowercase_name() {
        let patterns = ZoneNamePatterns::new().unwrap();
        let zones = vec![zone(
            "saludos\njuan martinez\nWhatsApp: +34 666 123 456\nMaquilogistics SL",
            "signature_saludos",
            0.9,
        )];
        let candidates = patterns.candidates(&zones);
        let best = &candidates[0];
        assert_eq!(best.text, "Juan Martinez");
        assert!((best.confidence - 0.81).abs() < 1e-9);
        assert_eq!(best.method, CandidateMethod::ZoneRegex);
        assert!(candidates.iter().all(|c| c.text != "Maquilogistics Sl"));
    }

    #[test]
    fn test_contact_request_name() {
        let patterns = ZoneNamePatterns::new().unwrap();
        let zones = vec![zone(
            "Favor de contactar a María García para más detalles",
            "contact_request",
            0.8,
        )];
        let candidates = patterns.candidates(&zones);
        assert_eq!(candidates[0].text, "María García");
        assert!((candidates[0].confidence - 0.64).abs() < 1e-9);
    }

    #[test]
    fn test_self_introduction_name() {
        let patterns = ZoneNamePatterns::new().unwrap();
        let zones = vec![zone("me llamo Carlos Ruiz", "self_introduction", 0.8)];
        let candidates = patterns.candidates(&zones);
        assert_eq!(candidates[0].text, "Carlos Ruiz");
        assert!((candidates[0].confidence - 0.64).abs() < 1e-9);
    }

    #[test]
    fn test_name_before_contact_handle() {
        let patterns = ZoneNamePatterns::new().unwrap();
        let zones = vec![zone("Ana Lopez\nTel: 600 111 222", "email_signature", 0.6)];
        let candidates = patterns.candidates(&zones);
        assert_eq!(candidates[0].text, "Ana Lopez");
        assert!((candidates[0].confidence - 0.42).abs() < 1e-9);
    }

    struct FixedRecognizer(Vec<RecognizedEntity>);

    #[async_trait]
    impl EntityRecognizer for FixedRecognizer {
        async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
            Ok(self.0.clone())
        }
    }

    struct FailingRecognizer;

    #[async_trait]
    impl EntityRecognizer for FailingRecognizer {
        async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
            Err(ExtractError::service("ner", "model not loaded"))
        }
    }

    #[tokio::test]
    async fn test_recognized_person_entities() {
        let recognizer = FixedRecognizer(vec![
            RecognizedEntity::new("Carlos López", "PER"),
            RecognizedEntity::new("Valencia", "LOC"),
            RecognizedEntity::new("Maquilogistics SL", "PER"),
        ]);
        let zones = vec![zone("Saludos\nCarlos López", "signature_saludos", 0.9)];
        let candidates = recognize_candidates(&recognizer, &zones).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "Carlos López");
        assert!((candidates[0].confidence - 0.81).abs() < 1e-9);
        assert_eq!(candidates[0].method, CandidateMethod::Ner);
    }

    #[tokio::test]
    async fn test_recognizer_error_propagates() {
        let zones = vec![zone("Saludos\nCarlos López", "signature_saludos", 0.9)];
        assert!(recognize_candidates(&FailingRecognizer, &zones).await.is_err());
    }
}
