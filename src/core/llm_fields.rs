use crate::domain::model::ServiceOutcome;
use crate::domain::ports::{CompletionClient, CompletionRequest};
use crate::utils::error::{ExtractError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const FIELD_TEMPERATURE: f32 = 0.1;
const FIELD_MAX_TOKENS: u32 = 500;

/// Few-shot prompt asking the model for every field as one JSON object.
pub fn field_prompt(text: &str) -> String {
    format!(
        r#"You are a freight forwarding assistant who reads informal Spanish and English quotation requests.
You know Spanish business naming conventions and logistics vocabulary.

Worked examples:

Email: "buenas, cotizacion urgente bilbao-rotterdam. peso total 1200kg. saludos ana ruiz +34 611 222 333"
JSON: {{"origin": "Bilbao, España", "destination": "Rotterdam, Países Bajos", "commodity": "", "weight": "1200kg", "urgency": "urgent", "contact_name": "Ana Ruiz"}}

Email: "enviamos repuestos de sevilla a hamburg, 3 toneladas en total. atentamente josé luis fernández torres, Cargas Sur SA"
JSON: {{"origin": "Sevilla, España", "destination": "Hamburg, Alemania", "commodity": "repuestos", "weight": "3000kg", "urgency": "normal", "contact_name": "José Luis Fernández Torres"}}

Email: "necesito precio para alimentos desde malaga hasta los angeles, 650kg. gracias carmen garcía Tel: 955 123 456"
JSON: {{"origin": "Málaga, España", "destination": "Los Angeles, Estados Unidos", "commodity": "alimentos", "weight": "650kg", "urgency": "normal", "contact_name": "Carmen García"}}

Rules:
1. The contact name usually follows "saludos", "atentamente", "gracias", "un saludo" or "cordialmente".
2. Spanish names have two to four words: given name(s) plus one or two surnames.
3. When a total weight is stated, report it instead of individual item weights.
4. "urgente", "muy urgente", "asap" and "rápido" mean urgency "urgent"; otherwise "normal".
5. Never report company suffixes (SL, SA, Ltd), job titles or places as a contact name.

Hints:
- Emails tend to end with the sender's name, then phone or WhatsApp, then the company.
- The personal name sits right above the phone number; the company comes after it.
- Leave a field as "" when the email does not mention it.

Email:
{text}

Answer with the JSON object only, using the keys origin, destination, commodity, weight, urgency and contact_name:"#
    )
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses the model answer as a flat JSON object. String and number values
/// are kept; nulls, booleans and nested values are ignored.
pub fn parse_fields(raw: &str) -> Result<HashMap<String, String>> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;
    let Value::Object(object) = value else {
        return Err(ExtractError::malformed("llm", "expected a JSON object"));
    };

    Ok(object
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s.trim().to_string())),
            Value::Number(n) => Some((key, n.to_string())),
            _ => None,
        })
        .collect())
}

/// Asks the LLM for every field at once; used as one more competing source.
pub struct LlmFieldExtractor {
    client: Option<Arc<dyn CompletionClient>>,
}

impl LlmFieldExtractor {
    pub fn new(client: Option<Arc<dyn CompletionClient>>) -> Self {
        Self { client }
    }

    pub async fn extract_via_llm(&self, text: &str) -> ServiceOutcome<HashMap<String, String>> {
        let Some(client) = self.client.as_deref() else {
            return ServiceOutcome::Unavailable("no completion client configured".to_string());
        };

        let request = CompletionRequest::new(field_prompt(text), FIELD_TEMPERATURE, FIELD_MAX_TOKENS);
        let raw = match client.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("LLM field extraction failed: {}", e);
                return ServiceOutcome::Unavailable(e.to_string());
            }
        };

        match parse_fields(&raw) {
            Ok(fields) if fields.values().all(String::is_empty) => ServiceOutcome::NotFound,
            Ok(fields) => {
                tracing::debug!(fields = fields.len(), "LLM field extraction parsed");
                ServiceOutcome::Found(fields)
            }
            Err(e) => {
                tracing::warn!("LLM field answer could not be parsed: {}", e);
                ServiceOutcome::Unavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Answer(&'static str);

    #[async_trait]
    impl CompletionClient for Answer {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            assert_eq!(request.max_tokens, FIELD_MAX_TOKENS);
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_prompt_embeds_email() {
        let prompt = field_prompt("envio 300kg a Lima");
        assert!(prompt.contains("Email:\nenvio 300kg a Lima\n"));
        assert!(prompt.contains("\"contact_name\": \"Ana Ruiz\"}"));
    }

    #[test]
    fn test_parse_fenced_json() {
        let fields = parse_fields("```json\n{\"origin\": \"Valencia, España\", \"weight\": 1900}\n```").unwrap();
        assert_eq!(fields["origin"], "Valencia, España");
        assert_eq!(fields["weight"], "1900");
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(parse_fields("[1, 2]").is_err());
        assert!(parse_fields("the origin is Valencia").is_err());
    }

    #[tokio::test]
    async fn test_outcomes() {
        let found = LlmFieldExtractor::new(Some(Arc::new(Answer("{\"destination\": \"Santos, Brasil\"}"))))
            .extract_via_llm("x")
            .await;
        assert_eq!(found.found().unwrap()["destination"], "Santos, Brasil");

        let empty = LlmFieldExtractor::new(Some(Arc::new(Answer("{\"origin\": \"\"}"))))
            .extract_via_llm("x")
            .await;
        assert_eq!(empty, ServiceOutcome::NotFound);

        let garbled = LlmFieldExtractor::new(Some(Arc::new(Answer("sorry"))))
            .extract_via_llm("x")
            .await;
        assert!(garbled.is_unavailable());

        assert!(LlmFieldExtractor::new(None).extract_via_llm("x").await.is_unavailable());
    }
}
