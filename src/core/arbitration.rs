//! Merging specialized results with the LLM answer, and the aggregate score.

use crate::domain::model::{ExtractionResult, Field};
use serde::{Deserialize, Serialize};

/// Specialized results above this always win over the LLM.
const TRUSTED: f64 = 0.7;
/// Specialized results above this are still used when the LLM has nothing.
const USABLE: f64 = 0.3;
const CONTACT_INFO_FLOOR: f64 = 0.5;
const CORE_BONUS: f64 = 1.1;
const CORE_BONUS_MIN_FIELDS: usize = 3;

const CORE_FIELDS: [Field; 4] = [Field::Origin, Field::Destination, Field::Commodity, Field::Weight];

/// Which fields feed the aggregate confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateWeighting {
    /// Origin, destination, commodity and weight only.
    #[default]
    CoreFields,
    /// The core fields plus urgency and contact name.
    AllFields,
}

impl AggregateWeighting {
    pub fn weights(&self) -> &'static [(Field, f64)] {
        match self {
            AggregateWeighting::CoreFields => &[
                (Field::Origin, 0.25),
                (Field::Destination, 0.25),
                (Field::Commodity, 0.20),
                (Field::Weight, 0.15),
            ],
            AggregateWeighting::AllFields => &[
                (Field::Origin, 0.25),
                (Field::Destination, 0.25),
                (Field::Commodity, 0.20),
                (Field::Weight, 0.15),
                (Field::Urgency, 0.10),
                (Field::ContactName, 0.05),
            ],
        }
    }
}

/// Final value of one arbitrated field.
pub fn merge_field(llm_value: Option<&str>, specialized: &ExtractionResult) -> String {
    let llm_value = llm_value.map(str::trim).filter(|v| !v.is_empty());

    if specialized.confidence > TRUSTED {
        specialized.value.clone()
    } else if let Some(value) = llm_value {
        value.to_string()
    } else if specialized.confidence > USABLE {
        specialized.value.clone()
    } else {
        String::new()
    }
}

/// Contact handles never come from the LLM.
pub fn contact_info_value(contact: &ExtractionResult) -> String {
    if contact.confidence > CONTACT_INFO_FLOOR {
        contact.value.clone()
    } else {
        String::new()
    }
}

/// Weighted average of the nonzero confidences, with a bonus when most core
/// fields are trusted. Fields that found nothing do not dilute the average.
pub fn aggregate_confidence(weighting: AggregateWeighting, confidence_of: impl Fn(Field) -> f64) -> f64 {
    let (score, total_weight) = weighting
        .weights()
        .iter()
        .map(|&(field, weight)| (confidence_of(field), weight))
        .filter(|&(confidence, _)| confidence > 0.0)
        .fold((0.0, 0.0), |(score, total), (confidence, weight)| {
            (score + confidence * weight, total + weight)
        });

    if total_weight == 0.0 {
        return 0.0;
    }

    let trusted = CORE_FIELDS
        .iter()
        .filter(|&&field| confidence_of(field) > TRUSTED)
        .count();
    let bonus = if trusted >= CORE_BONUS_MIN_FIELDS { CORE_BONUS } else { 1.0 };

    (score * bonus / total_weight).min(1.0)
}
