use crate::domain::model::{ExtractionResult, LocationEntry, LocationKind};
use crate::utils::error::Result;
use crate::utils::text::{compile_all, title_case};
use regex::Regex;

/// Gazetteer hits at or below this confidence fall through to contextual patterns.
const LOOKUP_THRESHOLD: f64 = 0.3;
const LOOKUP_CEILING: f64 = 0.9;
const CONTEXTUAL_CONFIDENCE: f64 = 0.6;

const fn entry(
    key: &'static str,
    city: &'static str,
    country: &'static str,
    kind: LocationKind,
    is_port: bool,
) -> LocationEntry {
    LocationEntry {
        key,
        city,
        country,
        kind,
        is_port,
    }
}

fn gazetteer() -> Vec<LocationEntry> {
    use LocationKind::{City, Port};
    vec![
        entry("valencia", "Valencia", "España", City, true),
        entry("madrid", "Madrid", "España", City, false),
        entry("barcelona", "Barcelona", "España", City, true),
        entry("bilbao", "Bilbao", "España", City, true),
        entry("sevilla", "Sevilla", "España", City, true),
        entry("malaga", "Málaga", "España", City, true),
        entry("santos", "Santos", "Brasil", Port, true),
        entry("sao paulo", "São Paulo", "Brasil", City, false),
        entry("rio", "Rio de Janeiro", "Brasil", City, true),
        entry("rio de janeiro", "Rio de Janeiro", "Brasil", City, true),
        entry("hamburg", "Hamburg", "Alemania", Port, true),
        entry("rotterdam", "Rotterdam", "Países Bajos", Port, true),
        entry("antwerp", "Antwerp", "Bélgica", Port, true),
        entry("genova", "Génova", "Italia", Port, true),
        entry("miami", "Miami", "Estados Unidos", City, true),
        entry("new york", "Nueva York", "Estados Unidos", City, true),
        entry("los angeles", "Los Ángeles", "Estados Unidos", City, true),
    ]
}

const ORIGIN_PATTERNS: &[&str] = &[
    r"\b(?:desde|de|from)\s+([^.]+?)(?:\s+hasta|\s+al|\s+to|\.)",
    r"origen\W*([^.]+?)(?:\s+|\.)",
];

const DESTINATION_PATTERNS: &[&str] = &[
    r"\b(?:hasta|al|a)\s+([^.]+?)(?:\s+|\.)",
    r"\b(?:to|towards?)\s+([^.]+?)(?:\s+|\.)",
    r"destino\W*([^.]+?)(?:\s+|\.)",
];

pub struct LocationResolver {
    gazetteer: Vec<LocationEntry>,
    origin_patterns: Vec<Regex>,
    destination_patterns: Vec<Regex>,
}

impl LocationResolver {
    pub fn new() -> Result<Self> {
        Ok(Self {
            gazetteer: gazetteer(),
            origin_patterns: compile_all(ORIGIN_PATTERNS)?,
            destination_patterns: compile_all(DESTINATION_PATTERNS)?,
        })
    }

    pub fn gazetteer(&self) -> &[LocationEntry] {
        &self.gazetteer
    }

    pub fn resolve(&self, text: &str, is_destination: bool) -> ExtractionResult {
        let lower = text.to_lowercase();

        if let Some((entry, confidence)) = self.lookup(&lower) {
            if confidence > LOOKUP_THRESHOLD {
                tracing::debug!(key = entry.key, confidence, "gazetteer match");
                return ExtractionResult::new(entry.display(), confidence, "database_lookup")
                    .with_raw_match(entry.key);
            }
        }

        let patterns = if is_destination {
            &self.destination_patterns
        } else {
            &self.origin_patterns
        };

        for pattern in patterns {
            if let Some(caps) = pattern.captures(&lower) {
                let location = title_case(caps[1].trim());
                if location.is_empty() {
                    continue;
                }
                tracing::debug!(%location, is_destination, "contextual location match");
                return ExtractionResult::new(location, CONTEXTUAL_CONFIDENCE, "contextual_pattern")
                    .with_raw_match(&caps[0]);
            }
        }

        ExtractionResult::empty("none")
    }

    /// Best gazetteer entry contained in `lower`; longer keys score higher, ties keep table order.
    fn lookup(&self, lower: &str) -> Option<(&LocationEntry, f64)> {
        let mut best: Option<(&LocationEntry, f64)> = None;
        for entry in &self.gazetteer {
            if !lower.contains(entry.key) {
                continue;
            }
            let confidence = (entry.key.chars().count() as f64 / 20.0).min(LOOKUP_CEILING);
            if best.map_or(true, |(_, current)| confidence > current) {
                best = Some((entry, confidence));
            }
        }
        best
    }
}
