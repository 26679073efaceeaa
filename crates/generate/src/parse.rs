//! Tolerant parsing of provider output. Models asked for strict JSON still
//! wrap it in prose or code fences often enough that every caller goes
//! through these helpers; a miss here is what triggers fallback content.

use serde_json::Value;

/// Parse a JSON object or array out of model output. Tries the raw text
/// first, then the outermost `{...}` / `[...]` slice.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (trimmed.find(open), trimmed.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Non-empty strings under `key`, or empty when absent/mistyped.
pub fn string_array(value: &Value, key: &str) -> Vec<String> {
    value[key]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|item| item.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Arrays of strings under `key` (thread shape).
pub fn string_matrix(value: &Value, key: &str) -> Vec<Vec<String>> {
    value[key]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|row| row.as_array())
                .map(|row| {
                    row.iter()
                        .filter_map(|item| item.as_str())
                        .map(|s| s.to_string())
                        .collect::<Vec<_>>()
                })
                .filter(|row: &Vec<String>| !row.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_object_parses() {
        let v = extract_json(r#"{"tweets":["a"]}"#).unwrap();
        assert_eq!(string_array(&v, "tweets"), vec!["a"]);
    }

    #[test]
    fn fenced_object_parses() {
        let v = extract_json("```json\n{\"tweets\":[\"a\"]}\n```").unwrap();
        assert_eq!(string_array(&v, "tweets"), vec!["a"]);
    }

    #[test]
    fn embedded_array_parses() {
        let text = "Here are the topics:\n[{\"title\":\"t\",\"summary\":\"s\"}]\nEnjoy!";
        let v = extract_json(text).unwrap();
        assert!(v.is_array());
    }

    #[test]
    fn prose_is_a_miss() {
        assert!(extract_json("I could not produce JSON today, sorry.").is_none());
    }

    #[test]
    fn string_array_skips_non_strings_and_blanks() {
        let v = serde_json::json!({"tweets": ["ok", "", 42, "  ", "also ok"]});
        assert_eq!(string_array(&v, "tweets"), vec!["ok", "also ok"]);
    }

    #[test]
    fn string_matrix_drops_empty_rows() {
        let v = serde_json::json!({"threads": [["t1", "t2"], [], ["u1"]]});
        let rows = string_matrix(&v, "threads");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["t1", "t2"]);
    }

    #[test]
    fn missing_key_is_empty() {
        let v = serde_json::json!({});
        assert!(string_array(&v, "tweets").is_empty());
        assert!(string_matrix(&v, "threads").is_empty());
    }
}
