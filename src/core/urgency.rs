use crate::domain::model::ExtractionResult;

/// Checked in order; the first phrase found decides the confidence.
const URGENCY_KEYWORDS: &[(&str, f64)] = &[
    ("muy urgente", 0.95),
    ("urgente", 0.85),
    ("urgent", 0.85),
    ("asap", 0.9),
    ("rapido", 0.7),
    ("fast", 0.7),
    ("priority", 0.8),
    ("expedite", 0.8),
];

/// Absence of urgency cues is itself a fairly confident "normal".
const DEFAULT_CONFIDENCE: f64 = 0.8;

pub fn classify_urgency(text: &str) -> ExtractionResult {
    let lower = text.to_lowercase();

    match URGENCY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
    {
        Some((keyword, confidence)) => {
            ExtractionResult::new("urgent", *confidence, "keyword_match").with_raw_match(*keyword)
        }
        None => ExtractionResult::new("normal", DEFAULT_CONFIDENCE, "default"),
    }
}
