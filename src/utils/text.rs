use crate::utils::error::Result;
use regex::Regex;

/// Uppercases the first letter of every alphabetic run and lowercases the rest,
/// so `"SANTOS brasil"` becomes `"Santos Brasil"` and `"o'neil"` becomes `"O'Neil"`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_alpha = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(c);
            previous_alpha = false;
        }
    }
    out
}

/// Collapses runs of whitespace (newlines included) into single spaces.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compiles an ordered pattern table, carrying each row's payload along.
pub fn compile_rows<'a, T>(rows: impl IntoIterator<Item = (&'a str, T)>) -> Result<Vec<(Regex, T)>> {
    rows.into_iter()
        .map(|(pattern, payload)| Ok((Regex::new(pattern)?, payload)))
        .collect()
}

pub fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns.iter().map(|pattern| Ok(Regex::new(pattern)?)).collect()
}
