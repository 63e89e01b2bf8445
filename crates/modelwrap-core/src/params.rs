use toml::Table;

/// Overlay call-time `overrides` on instance `defaults`.
///
/// Keys present in `overrides` win; keys only in `overrides` are added.
/// Neither input is modified. `None` behaves like an empty table.
pub fn merge(defaults: &Table, overrides: Option<&Table>) -> Table {
    let mut merged = defaults.clone();
    if let Some(overrides) = overrides {
        for (k, v) in overrides {
            merged.insert(k.clone(), v.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    fn table(entries: &[(&str, Value)]) -> Table {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_merge_override_wins_and_adds_keys() {
        let defaults = table(&[("temperature", Value::Float(0.1))]);
        let overrides = table(&[
            ("temperature", Value::Float(0.8)),
            ("max_output_tokens", Value::Integer(256)),
        ]);
        let merged = merge(&defaults, Some(&overrides));
        assert_eq!(
            merged,
            table(&[
                ("temperature", Value::Float(0.8)),
                ("max_output_tokens", Value::Integer(256)),
            ])
        );
        assert_eq!(defaults, table(&[("temperature", Value::Float(0.1))]));
        assert_eq!(overrides.len(), 2);
    }

    #[test]
    fn test_merge_empty_overrides_copies_defaults() {
        let defaults = table(&[("temperature", Value::Float(0.1))]);
        let mut merged = merge(&defaults, Some(&Table::new()));
        assert_eq!(merged, defaults);

        merged.insert("top_k".to_string(), Value::Integer(40));
        assert!(!defaults.contains_key("top_k"));
    }

    #[test]
    fn test_merge_none_is_empty_overrides() {
        let defaults = table(&[("top_p", Value::Float(0.9))]);
        assert_eq!(merge(&defaults, None), merge(&defaults, Some(&Table::new())));
    }

    #[test]
    fn test_merge_keys_are_case_sensitive() {
        let defaults = table(&[("temperature", Value::Float(0.1))]);
        let overrides = table(&[("Temperature", Value::Float(0.9))]);
        let merged = merge(&defaults, Some(&overrides));
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["temperature"], Value::Float(0.1));
        assert_eq!(merged["Temperature"], Value::Float(0.9));
    }

    #[test]
    fn test_merge_replaces_nested_values_wholesale() {
        let mut inner = Table::new();
        inner.insert("a".to_string(), Value::Integer(1));
        let defaults = table(&[("stop", Value::Table(inner))]);
        let overrides = table(&[(
            "stop",
            Value::Array(vec![Value::String("\n".to_string())]),
        )]);
        let merged = merge(&defaults, Some(&overrides));
        assert!(merged["stop"].is_array());
    }
}
