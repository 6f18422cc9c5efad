use serde::{Deserialize, Serialize};

/// One strategy's answer for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub value: String,
    pub confidence: f64,
    pub method: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_match: String,
}

impl ExtractionResult {
    /// Builds a result, clamping the confidence into `[0, 1]`.
    pub fn new(value: impl Into<String>, confidence: f64, method: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
            method: method.into(),
            raw_match: String::new(),
        }
    }

    /// The "nothing found" result: empty value, zero confidence.
    pub fn empty(method: impl Into<String>) -> Self {
        Self::new("", 0.0, method)
    }

    pub fn with_raw_match(mut self, raw_match: impl Into<String>) -> Self {
        self.raw_match = raw_match.into();
        self
    }

    pub fn is_found(&self) -> bool {
        !self.value.is_empty()
    }
}

/// Text span likely to contain a personal name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    pub text: String,
    pub zone_type: &'static str,
    pub confidence: f64,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateMethod {
    ZoneRegex,
    Ner,
}

impl CandidateMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateMethod::ZoneRegex => "zone_regex",
            CandidateMethod::Ner => "ner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameCandidate {
    pub text: String,
    pub confidence: f64,
    pub method: CandidateMethod,
    pub zone_type: &'static str,
    /// Source text of the zone the candidate came from.
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    City,
    Port,
}

/// Gazetteer row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationEntry {
    pub key: &'static str,
    pub city: &'static str,
    pub country: &'static str,
    pub kind: LocationKind,
    pub is_port: bool,
}

impl LocationEntry {
    pub fn display(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// Outcome of a call to an external service.
///
/// `NotFound` means the service answered but had nothing to offer;
/// `Unavailable` covers missing clients, transport errors and malformed answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ServiceOutcome<T> {
    Found(T),
    NotFound,
    Unavailable(String),
}

impl<T> ServiceOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            ServiceOutcome::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_found(&self) -> Option<&T> {
        match self {
            ServiceOutcome::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ServiceOutcome::Unavailable(_))
    }
}

/// Output fields, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Origin,
    Destination,
    Commodity,
    Weight,
    Urgency,
    ContactName,
    ContactInfo,
}

impl Field {
    /// Fields merged against the LLM answer.
    pub const ARBITRATED: [Field; 6] = [
        Field::Origin,
        Field::Destination,
        Field::Commodity,
        Field::Weight,
        Field::Urgency,
        Field::ContactName,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Field::Origin => "origin",
            Field::Destination => "destination",
            Field::Commodity => "commodity",
            Field::Weight => "weight",
            Field::Urgency => "urgency",
            Field::ContactName => "contact_name",
            Field::ContactInfo => "contact_info",
        }
    }
}

/// Specialized-strategy results for every field of one email.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldResults {
    pub origin: ExtractionResult,
    pub destination: ExtractionResult,
    pub commodity: ExtractionResult,
    pub weight: ExtractionResult,
    pub urgency: ExtractionResult,
    pub contact_name: ExtractionResult,
    pub contact_info: ExtractionResult,
}

impl FieldResults {
    pub fn get(&self, field: Field) -> &ExtractionResult {
        match field {
            Field::Origin => &self.origin,
            Field::Destination => &self.destination,
            Field::Commodity => &self.commodity,
            Field::Weight => &self.weight,
            Field::Urgency => &self.urgency,
            Field::ContactName => &self.contact_name,
            Field::ContactInfo => &self.contact_info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

/// Final per-field answer handed to the quoting workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub origin: String,
    pub destination: String,
    pub commodity: String,
    pub weight: String,
    pub urgency: String,
    pub contact_name: String,
    pub contact_info: String,
    pub extraction_confidence: f64,
}

impl ExtractionReport {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Origin => &self.origin,
            Field::Destination => &self.destination,
            Field::Commodity => &self.commodity,
            Field::Weight => &self.weight,
            Field::Urgency => &self.urgency,
            Field::ContactName => &self.contact_name,
            Field::ContactInfo => &self.contact_info,
        }
    }

    pub(crate) fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Origin => &mut self.origin,
            Field::Destination => &mut self.destination,
            Field::Commodity => &mut self.commodity,
            Field::Weight => &mut self.weight,
            Field::Urgency => &mut self.urgency,
            Field::ContactName => &mut self.contact_name,
            Field::ContactInfo => &mut self.contact_info,
        };
        *slot = value;
    }

    /// Re-parses the leading integer of the weight field (`"1900 kg"` -> 1900).
    pub fn weight_kg(&self) -> Option<u64> {
        let digits: String = self
            .weight
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }

    /// Origin, destination and weight are the minimum needed to price a shipment.
    pub fn is_quotable(&self) -> bool {
        !self.origin.is_empty() && !self.destination.is_empty() && self.weight_kg().is_some()
    }

    pub fn confidence_band(&self) -> ConfidenceBand {
        if self.extraction_confidence > 0.7 {
            ConfidenceBand::High
        } else if self.extraction_confidence > 0.4 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}
