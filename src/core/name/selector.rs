use super::validator::validate_name;
use crate::domain::model::{NameCandidate, ServiceOutcome};
use crate::domain::ports::{CompletionClient, CompletionRequest};

const MAX_PRESENTED: usize = 5;
/// With an LLM configured, a rejected pick only falls back to candidates above this.
const FALLBACK_FLOOR: f64 = 0.5;
const SELECTION_TEMPERATURE: f32 = 0.1;
const SELECTION_MAX_TOKENS: u32 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub name: Option<String>,
    /// What the LLM said, if it was asked.
    pub llm: ServiceOutcome<String>,
}

/// Candidates ordered by confidence, highest first; equal scores keep discovery order.
pub fn rank(candidates: &[NameCandidate]) -> Vec<&NameCandidate> {
    let mut ranked: Vec<&NameCandidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    ranked
}

pub fn selection_prompt(ranked: &[&NameCandidate]) -> String {
    let listing = ranked
        .iter()
        .take(MAX_PRESENTED)
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}. {} (found in {}, confidence: {:.2})",
                i + 1,
                c.text,
                c.zone_type,
                c.confidence
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You identify the sender's personal name in Spanish and English freight quotation emails.

These candidates were extracted from one request-for-quotation email:
{listing}

Pick the single most likely complete personal name:
- first name plus at least one surname, written in Title Case
- never a company, a job title, a city or a logistics term
- names from signatures and contact instructions are the most reliable
- Spanish names usually have two to four words (given name plus surnames)

Good answers look like "Juan Martinez", "María José García" or "Carlos López Mendez".
Answers such as "Logistics SL", "Contacto", "Valencia" or "Manager" are wrong.

Reply with the name only, or NONE if no candidate is a personal name.

Name:"#
    )
}

/// Cleans an LLM answer; `None` means the model declined.
fn parse_answer(raw: &str) -> Option<&str> {
    let answer = raw
        .trim()
        .trim_matches(&['"', '\''][..])
        .trim_end_matches('.')
        .trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(answer)
    }
}

/// Final stage of the name pipeline.
pub async fn select(llm: Option<&dyn CompletionClient>, candidates: &[NameCandidate]) -> Selection {
    let ranked = rank(candidates);
    let Some(best) = ranked.first() else {
        return Selection {
            name: None,
            llm: ServiceOutcome::NotFound,
        };
    };

    let Some(llm) = llm else {
        return Selection {
            name: Some(best.text.clone()),
            llm: ServiceOutcome::Unavailable("no completion client configured".to_string()),
        };
    };

    let request = CompletionRequest::new(
        selection_prompt(&ranked),
        SELECTION_TEMPERATURE,
        SELECTION_MAX_TOKENS,
    );
    let outcome = match llm.complete(&request).await {
        Ok(raw) => match parse_answer(&raw).and_then(validate_name) {
            Some(name) => ServiceOutcome::Found(name),
            None => {
                tracing::debug!(answer = %raw.trim(), "LLM declined or named an invalid candidate");
                ServiceOutcome::NotFound
            }
        },
        Err(e) => {
            tracing::warn!("LLM name selection failed: {}", e);
            ServiceOutcome::Unavailable(e.to_string())
        }
    };

    let name = match &outcome {
        ServiceOutcome::Found(name) => Some(name.clone()),
        _ if best.confidence > FALLBACK_FLOOR => Some(best.text.clone()),
        _ => None,
    };

    Selection { name, llm: outcome }
}
