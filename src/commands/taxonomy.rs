// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Taxonomy command - print the permitted values for categorical fields

use super::Output;
use crate::taxonomy::TaxonomyField;
use anyhow::Result;
use owo_colors::OwoColorize;

/// Render one or all vocabularies as text
pub fn render(field: Option<&str>, out: Output) -> Result<String> {
    let fields = match field {
        Some(name) => vec![TaxonomyField::from_key(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown categorical field: {}. Expected one of: {}",
                name,
                TaxonomyField::ALL.map(|f| f.key()).join(", ")
            )
        })?],
        None => TaxonomyField::ALL.to_vec(),
    };

    if out.json {
        let map: serde_json::Map<String, serde_json::Value> = fields
            .iter()
            .map(|f| {
                (
                    f.key().to_string(),
                    serde_json::json!({ "default": f.default_value(), "options": f.options() }),
                )
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&map)? + "\n");
    }

    let mut text = String::new();
    for f in fields {
        let heading = if out.color {
            format!("{} ({})\n", f.label().bold(), f.key().dimmed())
        } else {
            format!("{} ({})\n", f.label(), f.key())
        };
        text.push_str(&heading);
        for option in f.options() {
            let marker = if option == f.default_value() { "*" } else { " " };
            text.push_str(&format!("  {marker} {option}\n"));
        }
    }
    Ok(text)
}

/// Run the taxonomy command
pub fn run(field: Option<&str>, out: Output) -> Result<()> {
    print!("{}", render(field, out)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field_marks_default() {
        let text = render(Some("dutch-angle"), Output::default()).unwrap();
        assert_eq!(text, "dutch angle (dutch_angle)\n  * dutch left\n    dutch right\n");
    }

    #[test]
    fn test_json_lists_every_field() {
        let json = render(None, Output { json: true, color: false }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["movement"]["default"], "static");
        assert_eq!(value["shot_size"]["options"].as_array().unwrap().len(), 11);
    }

    #[test]
    fn test_unknown_field() {
        let err = render(Some("lighting"), Output::default()).unwrap_err();
        assert!(err.to_string().contains("Unknown categorical field"));
    }
}
