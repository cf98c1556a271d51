//! Migration of exported settings documents
//!
//! An exported settings document is a flat string-to-string mapping. Documents
//! written before schema v1 carry old settings keys and old widget identifiers
//! embedded in delimited list values; both are renamed here so an old export
//! imports cleanly into a current installation.
//!
//! Identifier rewriting tokenizes the value on the list delimiters (`;` and
//! `,`) and renames a token only when its base identifier — the text before
//! the first `__` — equals a rename-table entry. An identifier at the very end
//! of a value with no trailing delimiter is a complete token and is renamed;
//! an identifier embedded inside a longer token never is.

use std::collections::BTreeMap;

use crate::keys;

/// Migrate an exported settings document to the current schema.
///
/// Returns a new mapping; the input is not mutated.
#[must_use]
pub fn migrate_import_document(doc: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    doc.iter()
        .map(|(key, value)| {
            let new_key = keys::renamed_setting_key(key).unwrap_or(key.as_str());
            let new_value = if keys::WIDGET_LIST_SETTING_KEYS.contains(&new_key) {
                rewrite_delimited_value(value)
            } else {
                value.clone()
            };
            (new_key.to_string(), new_value)
        })
        .collect()
}

/// Rename widget identifiers inside a `;`/`,`-delimited value.
#[must_use]
pub fn rewrite_delimited_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut token = String::new();

    for ch in value.chars() {
        if ch == ';' || ch == ',' {
            push_token(&mut out, &token);
            out.push(ch);
            token.clear();
        } else {
            token.push(ch);
        }
    }
    push_token(&mut out, &token);

    out
}

fn push_token(out: &mut String, token: &str) {
    match keys::rename_widget_id(token) {
        Some(renamed) => out.push_str(&renamed),
        None => out.push_str(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_preserves_delimiters() {
        assert_eq!(
            rewrite_delimited_value("heartRate,bicycleSpeed;temperature"),
            "ant_heart_rate,ant_bicycle_speed;temperature_sensor"
        );
    }

    #[test]
    fn test_rewrite_trailing_identifier_without_delimiter() {
        assert_eq!(rewrite_delimited_value("temperature"), "temperature_sensor");
    }

    #[test]
    fn test_rewrite_ignores_partial_identifiers() {
        assert_eq!(
            rewrite_delimited_value("heartRateMonitor;myheartRate"),
            "heartRateMonitor;myheartRate"
        );
    }

    #[test]
    fn test_rewrite_preserves_custom_suffix() {
        assert_eq!(
            rewrite_delimited_value("heartRate__1;heartRate__2"),
            "ant_heart_rate__1;ant_heart_rate__2"
        );
    }

    #[test]
    fn test_rewrite_empty_value() {
        assert_eq!(rewrite_delimited_value(""), "");
        assert_eq!(rewrite_delimited_value(";"), ";");
    }
}
