use crate::utils::text::{collapse_whitespace, title_case};

const MIN_NAME_CHARS: usize = 3;
const MAX_NAME_CHARS: usize = 40;
const MAX_DIGITS: usize = 2;

/// Business, logistics, place and greeting vocabulary. Any occurrence inside
/// the candidate rejects it, so "Maquilogistics" and "Eurocargo" are caught.
const STOP_FRAGMENTS: &[&str] = &[
    // prices and quoting vocabulary
    "euro", "precio", "toneladas", "total", "aproximadamente", "presupuesto",
    "cotización", "cotizacion", "maquinas", "envio", "envío", "urgente", "seguro",
    "fabrica", "fábrica", "cliente", "esperando", "transporte", "días", "dias",
    // contact channels
    "whatsapp", "email", "phone", "móvil", "movil", "celular", "contacto",
    // company words
    "company", "empresa", "logistics",
    // places
    "valencia", "madrid", "barcelona", "santos", "brasil", "spain", "españa",
    // time words
    "mañana",
    // greetings and sign-offs
    "gracias", "saludos", "atentamente", "cordialmente", "favor", "llamar", "hola",
    "buenos", "buenas", "estimados",
];

/// Short suffixes and abbreviations; only whole words reject, so "Rosa"
/// and "Isabel" survive "sa".
const STOP_TOKENS: &[&str] = &["kg", "tel", "sl", "ltd", "sa", "inc", "corp", "hoy", "ayer"];

/// Returns the normalized, title-cased name, or `None` when `raw` cannot be a
/// personal name.
pub fn validate_name(raw: &str) -> Option<String> {
    let name = collapse_whitespace(raw);
    if name.is_empty() {
        return None;
    }

    let lower = name.to_lowercase();
    if STOP_FRAGMENTS.iter().any(|fragment| lower.contains(fragment))
        || lower.split(' ').any(|token| STOP_TOKENS.contains(&token))
    {
        return None;
    }

    let length = name.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&length) {
        return None;
    }

    if name.chars().filter(|c| c.is_ascii_digit()).count() > MAX_DIGITS {
        return None;
    }

    if name
        .chars()
        .any(|c| !(c.is_alphabetic() || c.is_ascii_digit() || c.is_whitespace()))
    {
        return None;
    }

    if !name.chars().any(char::is_alphabetic) {
        return None;
    }

    Some(title_case(&name))
}
