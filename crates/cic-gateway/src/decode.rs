//! Response decoding: fence stripping, JSON parsing, and per-entry validation.

use cic_config::{InvalidEntryPolicy, SearchConfig};
use cic_core::{CatechismEntry, dedup_by_number};
use cic_schema::SchemaContract;

use crate::error::SearchError;

/// Remove Markdown code-fence markup the model may wrap around its JSON.
#[must_use]
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Decode a non-empty response text into validated entries.
///
/// Items failing the schema contract or the entry invariants are handled per
/// `config.invalid_entries`; duplicate paragraph numbers keep the first
/// occurrence. Order is preserved and the result is capped at
/// `config.max_results`.
///
/// # Errors
///
/// - [`SearchError::MalformedResponse`] if the text is not JSON or not an array.
/// - [`SearchError::InvalidEntries`] if any item is invalid under
///   [`InvalidEntryPolicy::Reject`], or if no item survives validation.
pub fn decode_entries(
    text: &str,
    contract: &SchemaContract,
    config: &SearchConfig,
) -> Result<Vec<CatechismEntry>, SearchError> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        tracing::warn!("response contained only code fences");
        return Ok(Vec::new());
    }

    let payload: serde_json::Value = serde_json::from_str(&cleaned).map_err(|e| {
        tracing::warn!(%e, "response is not valid JSON");
        SearchError::MalformedResponse {
            detail: e.to_string(),
        }
    })?;

    let serde_json::Value::Array(items) = payload else {
        return Err(SearchError::MalformedResponse {
            detail: "expected a JSON array of entries".to_string(),
        });
    };
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let total = items.len();
    let mut entries = Vec::with_capacity(total);
    let mut indices = Vec::with_capacity(total);
    let mut violations = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match decode_item(contract, item) {
            Ok(entry) => {
                entries.push(entry);
                indices.push(index);
            }
            Err(reason) => violations.push(format!("item {index}: {reason}")),
        }
    }

    if !violations.is_empty() {
        if config.invalid_entries == InvalidEntryPolicy::Reject {
            return Err(SearchError::InvalidEntries { violations });
        }
        tracing::warn!(
            dropped = violations.len(),
            total,
            ?violations,
            "dropped invalid catechism entries"
        );
    }
    if entries.is_empty() {
        return Err(SearchError::InvalidEntries { violations });
    }

    // Repeats keep the first occurrence under either policy.
    let (mut entries, duplicates) = dedup_by_number(entries);
    if !duplicates.is_empty() {
        let duplicates: Vec<String> = duplicates
            .iter()
            .map(|(position, violation)| format!("item {}: {violation}", indices[*position]))
            .collect();
        tracing::warn!(?duplicates, "dropped repeated paragraph numbers");
    }

    let max = usize::try_from(config.max_results).unwrap_or(usize::MAX);
    if entries.len() > max {
        tracing::debug!(returned = entries.len(), max, "truncating results");
        entries.truncate(max);
    }
    Ok(entries)
}

fn decode_item(
    contract: &SchemaContract,
    mut item: serde_json::Value,
) -> Result<CatechismEntry, String> {
    contract.check_entry(&item).map_err(|e| e.to_string())?;
    coerce_integral_number(&mut item);
    let entry = serde_json::from_value::<CatechismEntry>(item)
        .map_err(|e| e.to_string())?
        .normalized();
    entry.validate().map_err(|e| e.to_string())?;
    Ok(entry)
}

/// JSON Schema counts `1324.0` as an integer but serde will not decode it
/// into a `u32`, so integral floats are rewritten before decoding.
fn coerce_integral_number(item: &mut serde_json::Value) {
    let Some(number) = item.get_mut("number") else {
        return;
    };
    if !number.is_f64() {
        return;
    }
    let Some(value) = number.as_f64() else {
        return;
    };
    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let integral = value as u64;
        *number = integral.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const PAYLOAD: &str = r#"[
        {"number": 1322, "text": "A sagrada Eucaristia completa a iniciação cristã.", "topic": "Eucaristia"},
        {"number": 1324, "text": "A Eucaristia é fonte e ápice de toda a vida cristã.", "topic": "Eucaristia", "reference": "LG 11"}
    ]"#;

    fn contract() -> SchemaContract {
        SchemaContract::new().unwrap()
    }

    fn numbers(entries: &[CatechismEntry]) -> Vec<u32> {
        entries.iter().map(|e| e.number).collect()
    }

    #[rstest]
    #[case::bare("[1, 2]")]
    #[case::json_fence("```json\n[1, 2]\n```")]
    #[case::upper_fence("```JSON\n[1, 2]\n```")]
    #[case::plain_fence("```\n[1, 2]\n```")]
    #[case::padded("  \n```json [1, 2] ```  \n")]
    fn strips_fences(#[case] raw: &str) {
        assert_eq!(strip_code_fences(raw), strip_code_fences("[1, 2]"));
    }

    #[test]
    fn fenced_payload_decodes_like_bare() {
        let config = SearchConfig::default();
        let fenced = format!("```json\n{PAYLOAD}\n```");
        let bare = decode_entries(PAYLOAD, &contract(), &config).unwrap();
        let wrapped = decode_entries(&fenced, &contract(), &config).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(numbers(&bare), vec![1322, 1324]);
    }

    #[test]
    fn fences_only_is_empty() {
        let entries = decode_entries("```json\n```", &contract(), &SearchConfig::default()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn empty_array_is_empty() {
        let entries = decode_entries("[]", &contract(), &SearchConfig::default()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn non_json_is_malformed() {
        let err = decode_entries(
            "Desculpe, não encontrei parágrafos.",
            &contract(),
            &SearchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::MalformedResponse { .. }));
    }

    #[test]
    fn object_payload_is_malformed() {
        let err = decode_entries(
            r#"{"number": 1, "text": "t", "topic": "x"}"#,
            &contract(),
            &SearchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::MalformedResponse { .. }));
    }

    #[test]
    fn drop_policy_filters_invalid_items() {
        let payload = r#"[
            {"number": 0, "text": "zero", "topic": "x"},
            {"number": 1324, "text": "A Eucaristia é fonte e ápice.", "topic": "Eucaristia"},
            {"number": "§1325", "text": "string number", "topic": "x"},
            {"number": 1326, "text": "   ", "topic": "x"},
            {"number": 1327, "text": "Em resumo, a Eucaristia é a síntese da nossa fé.", "topic": "Eucaristia"}
        ]"#;
        let entries = decode_entries(payload, &contract(), &SearchConfig::default()).unwrap();
        assert_eq!(numbers(&entries), vec![1324, 1327]);
    }

    #[test]
    fn reject_policy_fails_batch() {
        let config = SearchConfig {
            invalid_entries: InvalidEntryPolicy::Reject,
            ..Default::default()
        };
        let payload = r#"[
            {"number": 1324, "text": "A Eucaristia é fonte e ápice.", "topic": "Eucaristia"},
            {"number": 1325, "text": "texto", "topic": ""}
        ]"#;
        match decode_entries(payload, &contract(), &config) {
            Err(SearchError::InvalidEntries { violations }) => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].starts_with("item 1:"));
            }
            other => panic!("expected InvalidEntries, got {other:?}"),
        }
    }

    #[test]
    fn reject_policy_accepts_clean_batch() {
        let config = SearchConfig {
            invalid_entries: InvalidEntryPolicy::Reject,
            ..Default::default()
        };
        let entries = decode_entries(PAYLOAD, &contract(), &config).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn all_invalid_is_an_error_not_empty() {
        let payload = r#"[{"number": 0, "text": "", "topic": ""}]"#;
        let err = decode_entries(payload, &contract(), &SearchConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidEntries { .. }));
    }

    #[test]
    fn duplicates_keep_first() {
        let payload = r#"[
            {"number": 1324, "text": "primeiro", "topic": "Eucaristia"},
            {"number": 1324, "text": "segundo", "topic": "Eucaristia"}
        ]"#;
        let entries = decode_entries(payload, &contract(), &SearchConfig::default()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "primeiro");
    }

    #[test]
    fn reject_policy_keeps_first_duplicate() {
        let config = SearchConfig {
            invalid_entries: InvalidEntryPolicy::Reject,
            ..Default::default()
        };
        let payload = r#"[
            {"number": 1324, "text": "primeiro", "topic": "Eucaristia"},
            {"number": 1325, "text": "outro", "topic": "Eucaristia"},
            {"number": 1324, "text": "segundo", "topic": "Eucaristia"}
        ]"#;
        let entries = decode_entries(payload, &contract(), &config).unwrap();
        assert_eq!(numbers(&entries), vec![1324, 1325]);
        assert_eq!(entries[0].text, "primeiro");
    }

    #[test]
    fn reject_policy_ignores_duplicates_when_listing_violations() {
        let config = SearchConfig {
            invalid_entries: InvalidEntryPolicy::Reject,
            ..Default::default()
        };
        let payload = r#"[
            {"number": 1324, "text": "primeiro", "topic": "Eucaristia"},
            {"number": 1324, "text": "segundo", "topic": "Eucaristia"},
            {"number": 1326, "text": "", "topic": "Eucaristia"}
        ]"#;
        match decode_entries(payload, &contract(), &config) {
            Err(SearchError::InvalidEntries { violations }) => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].starts_with("item 2:"));
            }
            other => panic!("expected InvalidEntries, got {other:?}"),
        }
    }

    #[rstest]
    #[case::drop(InvalidEntryPolicy::Drop)]
    #[case::reject(InvalidEntryPolicy::Reject)]
    fn integral_float_number_decodes(#[case] policy: InvalidEntryPolicy) {
        let config = SearchConfig {
            invalid_entries: policy,
            ..Default::default()
        };
        let payload = r#"[{"number": 1324.0, "text": "A Eucaristia é fonte e ápice.", "topic": "Eucaristia"}]"#;
        let entries = decode_entries(payload, &contract(), &config).unwrap();
        assert_eq!(numbers(&entries), vec![1324]);
    }

    #[test]
    fn fractional_number_is_invalid() {
        let payload = r#"[{"number": 1324.5, "text": "texto", "topic": "Eucaristia"}]"#;
        let err = decode_entries(payload, &contract(), &SearchConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidEntries { .. }));
    }

    #[test]
    fn truncates_to_max_results() {
        let items: Vec<String> = (1..=8)
            .map(|n| format!(r#"{{"number": {n}, "text": "texto {n}", "topic": "Credo"}}"#))
            .collect();
        let payload = format!("[{}]", items.join(","));
        let entries = decode_entries(&payload, &contract(), &SearchConfig::default()).unwrap();
        assert_eq!(numbers(&entries), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn blank_reference_is_dropped() {
        let payload = r#"[{"number": 1, "text": "texto", "topic": "Credo", "reference": " "}]"#;
        let entries = decode_entries(payload, &contract(), &SearchConfig::default()).unwrap();
        assert!(entries[0].reference.is_none());
    }
}
