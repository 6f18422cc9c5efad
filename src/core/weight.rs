use crate::domain::model::ExtractionResult;
use crate::utils::error::Result;
use crate::utils::text::compile_rows;
use regex::Regex;

const EXPLICIT_CONFIDENCE: f64 = 0.9;
const MENTION_CONFIDENCE: f64 = 0.7;
const LARGEST_CONFIDENCE: f64 = 0.8;
/// Candidates below this many kilograms are treated as accessories.
const SIGNIFICANT_KG: f64 = 100.0;
const KG_PER_TONNE: f64 = 1000.0;
const KG_PER_POUND: f64 = 0.453592;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightUnit {
    Kilograms,
    Tonnes,
    Pounds,
}

impl WeightUnit {
    fn to_kg(self, value: f64) -> f64 {
        match self {
            WeightUnit::Kilograms => value,
            WeightUnit::Tonnes => value * KG_PER_TONNE,
            WeightUnit::Pounds => value * KG_PER_POUND,
        }
    }
}

const WEIGHT_PATTERNS: &[(&str, WeightUnit)] = &[
    (r"(\d+(?:\.\d+)?)\s*(?:kg|kilos?|kilogramos?)", WeightUnit::Kilograms),
    (r"(\d+(?:\.\d+)?)\s*(?:ton|tons?|toneladas?)", WeightUnit::Tonnes),
    (r"(\d+(?:\.\d+)?)\s*(?:lb|lbs|pounds?)", WeightUnit::Pounds),
    (r"total[^\d]*(\d+(?:\.\d+)?)\s*(?:kg|kilos?)", WeightUnit::Kilograms),
    (r"peso[^\d]*(\d+(?:\.\d+)?)\s*(?:kg|kilos?)", WeightUnit::Kilograms),
    (r"(\d+(?:\.\d+)?)\s*t(?:\s|$)", WeightUnit::Tonnes),
];

#[derive(Debug, Clone, PartialEq)]
pub struct WeightCandidate {
    pub kilograms: f64,
    pub confidence: f64,
    pub raw: String,
}

pub struct WeightParser {
    patterns: Vec<(Regex, WeightUnit)>,
}

impl WeightParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: compile_rows(WEIGHT_PATTERNS.iter().copied())?,
        })
    }

    /// Every weight mention in `text`, in pattern order then position order.
    pub fn candidates(&self, text: &str) -> Vec<WeightCandidate> {
        let lower = text.to_lowercase();
        let mut candidates = Vec::new();

        for (pattern, unit) in &self.patterns {
            for caps in pattern.captures_iter(&lower) {
                let raw = &caps[0];
                let Ok(value) = caps[1].parse::<f64>() else {
                    tracing::debug!(raw, "dropping unparseable weight literal");
                    continue;
                };
                let confidence = if raw.contains("total") || raw.contains("peso") {
                    EXPLICIT_CONFIDENCE
                } else {
                    MENTION_CONFIDENCE
                };
                candidates.push(WeightCandidate {
                    kilograms: unit.to_kg(value),
                    confidence,
                    raw: raw.to_string(),
                });
            }
        }

        candidates
    }

    pub fn parse_weight(&self, text: &str) -> ExtractionResult {
        let candidates = self.candidates(text);
        tracing::debug!(count = candidates.len(), "weight candidates collected");
        reconcile(&candidates)
    }
}

/// Picks one weight out of many: explicit totals, then a lone mention,
/// then the largest significant figure, then the sum of small ones.
pub fn reconcile(candidates: &[WeightCandidate]) -> ExtractionResult {
    if candidates.is_empty() {
        return ExtractionResult::empty("none");
    }

    let explicit = first_max_by(
        candidates.iter().filter(|c| c.confidence >= EXPLICIT_CONFIDENCE),
        |c| c.confidence,
    );
    if let Some(best) = explicit {
        return format_result(best.kilograms, best.confidence, "explicit_total", &best.raw);
    }

    if let [single] = candidates {
        return format_result(single.kilograms, single.confidence, "single_weight", &single.raw);
    }

    let largest = first_max_by(
        candidates.iter().filter(|c| c.kilograms >= SIGNIFICANT_KG),
        |c| c.kilograms,
    );
    if let Some(best) = largest {
        return format_result(best.kilograms, LARGEST_CONFIDENCE, "largest_weight", &best.raw);
    }

    let total: f64 = candidates.iter().map(|c| c.kilograms).sum();
    let average = candidates.iter().map(|c| c.confidence).sum::<f64>() / candidates.len() as f64;
    let raw = candidates
        .iter()
        .map(|c| c.raw.as_str())
        .collect::<Vec<_>>()
        .join(" + ");
    format_result(total, average, "small_weights_sum", &raw)
}

fn first_max_by<'a, I, F>(items: I, key: F) -> Option<&'a WeightCandidate>
where
    I: Iterator<Item = &'a WeightCandidate>,
    F: Fn(&WeightCandidate) -> f64,
{
    items.fold(None, |best, item| match best {
        Some(current) if key(current) >= key(item) => Some(current),
        _ => Some(item),
    })
}

fn format_result(kilograms: f64, confidence: f64, method: &str, raw: &str) -> ExtractionResult {
    ExtractionResult::new(format!("{:.0} kg", kilograms), confidence, method).with_raw_match(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ExtractionResult {
        WeightParser::new().unwrap().parse_weight(text)
    }

    #[test]
    fn test_explicit_total_wins_over_items() {
        let text = "una cortadora pesa 890kg mas o menos\n\
                    soldadora de 65kg\n\
                    compresor 950kg aprox\n\
                    TOTAL= mas o menos 1900kg pero pueden ser hasta 2200kg";
        let result = parse(text);
        assert_eq!(result.value, "1900 kg");
        assert_eq!(result.method, "explicit_total");
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_largest_weight_without_total() {
        let result = parse("cortadora 890kg y compresor 950kg");
        assert_eq!(result.value, "950 kg");
        assert_eq!(result.method, "largest_weight");
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn test_small_weights_are_summed() {
        let result = parse("caja A 5kg, caja B 3kg");
        assert_eq!(result.value, "8 kg");
        assert_eq!(result.method, "small_weights_sum");
        assert!((result.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_single_weight_and_unit_conversion() {
        let tonnes = parse("aprox 2.5 toneladas");
        assert_eq!(tonnes.value, "2500 kg");
        assert_eq!(tonnes.method, "single_weight");
        assert_eq!(tonnes.confidence, 0.7);

        let pounds = parse("about 1000 lbs of cargo");
        assert_eq!(pounds.value, "454 kg");
    }

    #[test]
    fn test_bare_tonne_suffix() {
        let candidates = WeightParser::new().unwrap().candidates("carga de 3 t");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kilograms, 3000.0);
    }

    #[test]
    fn test_peso_keyword_is_explicit() {
        let result = parse("peso aproximado 750 kg, caja extra 900kg");
        assert_eq!(result.value, "750 kg");
        assert_eq!(result.method, "explicit_total");
    }

    #[test]
    fn test_no_weight() {
        let result = parse("necesito una cotizacion");
        assert_eq!(result.value, "");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.method, "none");
    }

    #[test]
    fn test_reconcile_keeps_first_of_equal_totals() {
        let candidates = vec![
            WeightCandidate { kilograms: 1200.0, confidence: 0.9, raw: "total 1200kg".into() },
            WeightCandidate { kilograms: 1500.0, confidence: 0.9, raw: "peso 1500kg".into() },
        ];
        assert_eq!(reconcile(&candidates).value, "1200 kg");
    }
}
