//! Layered merging of settings trees.
//!
//! Objects merge key by key, everything else is replaced by the higher layer.

use serde_json::Value;

/// Merge `overlay` onto `base`, the overlay winning on conflicts.
///
/// A `null` in the overlay leaves the base untouched, so a settings file can
/// mention a key without changing it.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut merged), Value::Object(layer)) => {
            for (key, layer_value) in layer {
                let value = match merged.remove(&key) {
                    Some(base_value) => deep_merge(base_value, layer_value),
                    None => layer_value,
                };
                merged.insert(key, value);
            }
            Value::Object(merged)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Fold [`deep_merge`] over layers ordered lowest to highest priority.
pub fn deep_merge_all(layers: impl IntoIterator<Item = Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_layer_overrides_defaults() {
        let defaults = json!({"paths": {"config_dir": "./config", "i18n_dir": "./i18n"}});
        let project = json!({"paths": {"config_dir": "/srv/alas/config"}});
        assert_eq!(
            deep_merge(defaults, project),
            json!({"paths": {"config_dir": "/srv/alas/config", "i18n_dir": "./i18n"}})
        );
    }

    #[test]
    fn test_lists_are_replaced() {
        let defaults = json!({"generation": {"languages": ["zh-CN", "en-US"]}});
        let user = json!({"generation": {"languages": ["ja-JP"]}});
        assert_eq!(
            deep_merge(defaults, user),
            json!({"generation": {"languages": ["ja-JP"]}})
        );
    }

    #[test]
    fn test_null_keeps_lower_layer() {
        let defaults = json!({"paths": {"event_file": "./campaign/Readme.md"}});
        let user = json!({"paths": {"event_file": null}});
        assert_eq!(
            deep_merge(defaults, user),
            json!({"paths": {"event_file": "./campaign/Readme.md"}})
        );
    }

    #[test]
    fn test_merge_all_layers_in_order() {
        let merged = deep_merge_all(vec![
            json!({"generation": {"event_order": "newest_first", "languages": ["en-US"]}}),
            json!({"generation": {"event_order": "oldest_first"}}),
            json!({"paths": {"config_dir": "cfg"}}),
        ]);
        assert_eq!(
            merged,
            json!({
                "generation": {"event_order": "oldest_first", "languages": ["en-US"]},
                "paths": {"config_dir": "cfg"}
            })
        );
    }
}
