use crate::domain::model::ExtractionResult;
use crate::utils::error::Result;
use crate::utils::text::compile_all;
use regex::Regex;

const PATTERN_CONFIDENCE: f64 = 0.8;
const FALLBACK_CONFIDENCE: f64 = 0.5;
const FALLBACK_KEYWORDS: &[&str] = &["maquina", "equipo", "machinery"];
const FALLBACK_DESCRIPTION: &str = "Maquinaria/Equipos";

/// Category table. Earlier groups win when an email mentions several.
const COMMODITY_TABLE: &[(&str, &str, &[&str])] = &[
    (
        "maquinaria_pesada",
        "Maquinaria pesada",
        &[
            r"maquinarias?\s+pesadas?",
            r"maquinarias?\s+[^.]*industrial",
            r"equipos?\s+pesados?",
        ],
    ),
    ("textiles", "Textiles", &[r"textiles?", r"ropa", r"telas?", r"algodón"]),
    (
        "repuestos",
        "Repuestos",
        &[r"repuestos?", r"spare\s+parts?", r"components?", r"piezas?"],
    ),
    (
        "electronica",
        "Electrónicos",
        &[r"electrónicos?", r"electronics?", r"dispositivos?"],
    ),
    ("alimentos", "Alimentos", &[r"alimentos?", r"food", r"comida"]),
];

#[derive(Debug, Clone)]
pub struct CommodityPattern {
    pub patterns: Vec<Regex>,
    pub category: &'static str,
    pub description: &'static str,
}

pub struct CommodityClassifier {
    groups: Vec<CommodityPattern>,
}

impl CommodityClassifier {
    pub fn new() -> Result<Self> {
        let groups = COMMODITY_TABLE
            .iter()
            .map(|&(category, description, patterns)| {
                Ok(CommodityPattern {
                    patterns: compile_all(patterns)?,
                    category,
                    description,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[CommodityPattern] {
        &self.groups
    }

    pub fn classify(&self, text: &str) -> ExtractionResult {
        let lower = text.to_lowercase();

        for group in &self.groups {
            if let Some(found) = group.patterns.iter().find_map(|p| p.find(&lower)) {
                tracing::debug!(category = group.category, "commodity pattern match");
                return ExtractionResult::new(group.description, PATTERN_CONFIDENCE, "pattern_match")
                    .with_raw_match(found.as_str());
            }
        }

        if let Some(keyword) = FALLBACK_KEYWORDS.iter().find(|k| lower.contains(*k)) {
            return ExtractionResult::new(FALLBACK_DESCRIPTION, FALLBACK_CONFIDENCE, "keyword_fallback")
                .with_raw_match(*keyword);
        }

        ExtractionResult::empty("none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> CommodityClassifier {
        CommodityClassifier::new().unwrap()
    }

    #[test]
    fn test_heavy_machinery() {
        let result = classifier().classify("son MAQUINARIAS PESADAS de segunda mano");
        assert_eq!(result.value, "Maquinaria pesada");
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.method, "pattern_match");
    }

    #[test]
    fn test_group_order_decides_between_categories() {
        // Mentions both textiles and food: textiles comes first in the table.
        let result = classifier().classify("envio de comida y ropa");
        assert_eq!(result.value, "Textiles");
    }

    #[test]
    fn test_spare_parts_and_electronics() {
        assert_eq!(classifier().classify("Spare parts for trucks").value, "Repuestos");
        assert_eq!(classifier().classify("cajas de electrónicos").value, "Electrónicos");
    }

    #[test]
    fn test_keyword_fallback() {
        let result = classifier().classify("tengo 3 maquinas para enviar");
        assert_eq!(result.value, "Maquinaria/Equipos");
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.method, "keyword_fallback");
    }

    #[test]
    fn test_no_commodity() {
        let result = classifier().classify("hola, necesito una cotizacion");
        assert_eq!(result.value, "");
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_table_order_is_stable() {
        let categories: Vec<&str> = classifier().groups().iter().map(|g| g.category).collect();
        assert_eq!(
            categories,
            vec!["maquinaria_pesada", "textiles", "repuestos", "electronica", "alimentos"]
        );
    }
}
