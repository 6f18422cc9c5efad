use crate::domain::model::Zone;
use crate::utils::error::Result;
use crate::utils::text::compile_rows;
use regex::Regex;

/// Zone detectors in evaluation order: (pattern, zone type, confidence).
const ZONE_PATTERNS: &[(&str, &str, f64)] = &[
    (r"(?i)saludos[^\n]*(?:\n[^\n]*){0,3}", "signature_saludos", 0.9),
    (r"(?i)atentamente[^\n]*(?:\n[^\n]*){0,3}", "signature_atentamente", 0.9),
    (r"(?i)gracias[^\n]*(?:\n[^\n]*){0,3}", "signature_gracias", 0.8),
    (r"(?i)cordialmente[^\n]*(?:\n[^\n]*){0,3}", "signature_cordialmente", 0.9),
    (r"(?i)contacto?[:\s]+[^\n.]{5,50}", "contact_instruction", 0.8),
    (r"(?i)favor\s+de\s+contactar[^\n.]{5,50}", "contact_request", 0.8),
    (r"(?i)comunicarse\s+con[^\n.]{5,50}", "contact_request", 0.8),
    (r"(?i)llamar\s+a[^\n.]{5,50}", "contact_request", 0.7),
    (r"(?i)dirigirse\s+a[^\n.]{5,50}", "contact_request", 0.7),
    (r"(?i)\bsoy\s+[^\n.]{3,30}", "self_introduction", 0.7),
    (r"(?i)me\s+llamo\s+[^\n.]{3,30}", "self_introduction", 0.8),
    (r"(?i)mi\s+nombre\s+es\s+[^\n.]{3,30}", "self_introduction", 0.8),
    (
        r"(?i)[A-ZÁÉÍÓÚÑÜ][a-záéíóúñü\s]{5,40}\s+(?:se\s+encargará|manejará|atenderá)",
        "delegation",
        0.6,
    ),
    (
        r"(?i)\n[A-ZÁÉÍÓÚÑÜ][a-záéíóúñü\s]{5,40}\n(?:[^\n]*(?:tel|email|whatsapp|phone)[^\n]*\n?){1,3}",
        "email_signature",
        0.6,
    ),
];

const MIN_ZONE_CHARS: usize = 4;

pub struct ZoneDetector {
    patterns: Vec<(Regex, (&'static str, f64))>,
}

impl ZoneDetector {
    pub fn new() -> Result<Self> {
        let rows = ZONE_PATTERNS
            .iter()
            .map(|&(pattern, zone_type, confidence)| (pattern, (zone_type, confidence)));
        Ok(Self {
            patterns: compile_rows(rows)?,
        })
    }

    /// All zones in `text`, highest confidence first and, among equals,
    /// latest in the message first. Overlapping zones are all kept.
    pub fn detect(&self, text: &str) -> Vec<Zone> {
        let mut zones = Vec::new();

        for (pattern, (zone_type, confidence)) in &self.patterns {
            for found in pattern.find_iter(text) {
                let zone_text = found.as_str().trim();
                if zone_text.chars().count() < MIN_ZONE_CHARS {
                    continue;
                }
                zones.push(Zone {
                    text: zone_text.to_string(),
                    zone_type: *zone_type,
                    confidence: *confidence,
                    start: found.start(),
                    end: found.end(),
                });
            }
        }

        zones.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| b.start.cmp(&a.start))
        });
        zones
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<Zone> {
        ZoneDetector::new().unwrap().detect(text)
    }

    #[test]
    fn test_signature_zone_with_trailing_lines() {
        let zones = detect("texto\nsaludos\njuan martinez\nWhatsApp: +34 666 123 456\nMaquilogistics SL\nvalencia");
        let signature = zones.iter().find(|z| z.zone_type == "signature_saludos").unwrap();
        assert_eq!(
            signature.text,
            "saludos\njuan martinez\nWhatsApp: +34 666 123 456\nMaquilogistics SL"
        );
        assert_eq!(signature.confidence, 0.9);
    }

    #[test]
    fn test_zones_sorted_by_confidence_then_position() {
        let zones = detect("Soy Pedro Ruiz de Cargas.\nSaludos cordiales\nAna Lopez");
        let order: Vec<(&str, f64)> = zones.iter().map(|z| (z.zone_type, z.confidence)).collect();
        assert_eq!(order[0].1, 0.9);
        assert!(order.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(zones.last().unwrap().zone_type, "self_introduction");
    }

    #[test]
    fn test_equal_confidence_prefers_later_zone() {
        let zones = detect("Saludos a todos.\n\nmas texto\n\n\n\nSaludos\nAna Lopez");
        assert_eq!(zones.len(), 2);
        assert!(zones[0].start > zones[1].start);
    }

    #[test]
    fn test_self_introduction_needs_word_start() {
        let zones = detect("hola, soy Pedro Ruiz");
        assert_eq!(zones[0].zone_type, "self_introduction");
        assert_eq!(zones[0].text, "soy Pedro Ruiz");

        assert!(detect("ensoy algo raro").is_empty());
    }

    #[test]
    fn test_no_zones() {
        assert!(detect("necesito cotizar 500kg a Miami").is_empty());
    }
}
