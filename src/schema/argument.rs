//! Canonical argument records.

use super::kind::ValueKind;
use crate::tree::{self, Path};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Strings longer than this are edited in a textarea.
const TEXTAREA_MIN_LEN: usize = 64;

/// Widget type of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    Input,
    Checkbox,
    Select,
    Textarea,
    /// Fixed by the schema, never user-editable.
    Disable,
}

impl ArgType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgType::Input => "input",
            ArgType::Checkbox => "checkbox",
            ArgType::Select => "select",
            ArgType::Textarea => "textarea",
            ArgType::Disable => "disable",
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArgType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(ArgType::Input),
            "checkbox" => Ok(ArgType::Checkbox),
            "select" => Ok(ArgType::Select),
            "textarea" => Ok(ArgType::Textarea),
            "disable" => Ok(ArgType::Disable),
            other => Err(format!("unknown argument type: {other}")),
        }
    }
}

/// Canonical description of one argument.
///
/// Fields other than `type`, `value` and `option` are carried through
/// untouched in `extra`; event binding also records per-locale data there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    #[serde(rename = "type")]
    pub kind: ArgType,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArgumentSpec {
    /// Normalize a raw fragment for the argument called `name`.
    pub fn normalize(name: &str, raw: RawArgument) -> Self {
        let mut fields = match raw {
            RawArgument::Bare(value) => {
                let mut fields = Map::new();
                fields.insert("value".to_string(), value);
                fields
            }
            RawArgument::Partial(fields) => fields,
        };

        let value = fields
            .remove("value")
            .unwrap_or_else(|| Value::String(String::new()));
        let option = match fields.remove("option") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(items),
            Some(single) => Some(vec![single]),
        };

        let inferred = infer_type(name, &value, option.as_deref());
        let kind = match fields.remove("type") {
            None => inferred,
            Some(Value::String(explicit)) => explicit.parse().unwrap_or_else(|err| {
                warn!(argument = %name, "{err}, inferring `{inferred}`");
                inferred
            }),
            Some(other) => {
                warn!(argument = %name, "argument type `{other}` is not a string, inferring `{inferred}`");
                inferred
            }
        };

        Self {
            kind,
            value,
            option,
            extra: fields,
        }
    }

    /// Whether `value` is acceptable for this argument's option list.
    ///
    /// Arguments without options accept anything.
    pub fn allows(&self, value: &Value) -> bool {
        self.option.is_none() || self.matching_option(value).is_some()
    }

    /// The option equal to `value`. Numbers compare by value, so `2.0`
    /// matches an option `2`.
    pub fn matching_option(&self, value: &Value) -> Option<&Value> {
        self.option
            .as_ref()?
            .iter()
            .find(|option| same_value(option, value))
    }

    pub fn value_kind(&self) -> ValueKind {
        ValueKind::of(&self.value)
    }

    /// Read a pass-through field by nested path.
    pub fn extra_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        tree::get_in(&self.extra, path)
    }

    /// Write a pass-through field unless one is already present.
    pub fn default_extra<S: AsRef<str>>(&mut self, path: &[S], value: Value) -> bool {
        tree::set_in_if_absent(&mut self.extra, path, value)
    }
}

/// A raw argument fragment as written in the schema: either a bare default
/// value or a partial record.
#[derive(Debug, Clone, PartialEq)]
pub enum RawArgument {
    Bare(Value),
    Partial(Map<String, Value>),
}

impl From<Value> for RawArgument {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => RawArgument::Partial(fields),
            other => RawArgument::Bare(other),
        }
    }
}

/// Infer the widget type from an argument's name, default and options.
///
/// Rules, first match wins:
/// 1. boolean default: `checkbox`
/// 2. exactly two boolean options: `checkbox`
/// 3. any options: `select`
/// 4. name contains `Filter`, or a multi-line or long string default: `textarea`
/// 5. otherwise `input`
pub fn infer_type(name: &str, value: &Value, option: Option<&[Value]>) -> ArgType {
    if value.is_boolean() {
        return ArgType::Checkbox;
    }
    match option {
        Some(options) if options.len() == 2 && options.iter().all(Value::is_boolean) => {
            return ArgType::Checkbox;
        }
        Some(options) if !options.is_empty() => return ArgType::Select,
        _ => {}
    }
    let long_text = value
        .as_str()
        .is_some_and(|s| s.contains('\n') || s.chars().count() > TEXTAREA_MIN_LEN);
    if name.contains("Filter") || long_text {
        ArgType::Textarea
    } else {
        ArgType::Input
    }
}

fn same_value(option: &Value, value: &Value) -> bool {
    match (option, value) {
        (Value::Number(a), Value::Number(b)) => a == b || a.as_f64() == b.as_f64(),
        _ => option == value,
    }
}

/// Arguments of one group, in definition order.
pub type ArgumentGroup = IndexMap<String, ArgumentSpec>;

/// Normalized argument definitions: `group -> argument -> spec`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentDefinitions {
    groups: IndexMap<String, ArgumentGroup>,
}

impl ArgumentDefinitions {
    /// Normalize every `group.argument` fragment of a raw definition tree.
    pub fn from_raw(raw: &Value) -> Self {
        let mut definitions = Self::default();
        for (path, fragment) in tree::iter(raw, 2) {
            let [group, argument] = path.segments() else {
                continue;
            };
            let spec = ArgumentSpec::normalize(argument, RawArgument::from(fragment.clone()));
            definitions.insert(group, argument, spec);
        }
        definitions
    }

    pub fn insert(&mut self, group: &str, argument: &str, spec: ArgumentSpec) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(argument.to_string(), spec);
    }

    pub fn group(&self, group: &str) -> Option<&ArgumentGroup> {
        self.groups.get(group)
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    pub fn get(&self, group: &str, argument: &str) -> Option<&ArgumentSpec> {
        self.groups.get(group)?.get(argument)
    }

    /// Every `(group.argument, spec)` pair, group then argument order.
    pub fn leaves(&self) -> impl Iterator<Item = (Path, &ArgumentSpec)> {
        self.groups.iter().flat_map(|(group, arguments)| {
            arguments
                .iter()
                .map(move |(argument, spec)| (Path::from([group.as_str(), argument.as_str()]), spec))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(name: &str, raw: Value) -> ArgumentSpec {
        ArgumentSpec::normalize(name, RawArgument::from(raw))
    }

    #[test]
    fn test_bare_value_is_wrapped() {
        let spec = normalize("Serial", json!("auto"));
        assert_eq!(spec.kind, ArgType::Input);
        assert_eq!(spec.value, json!("auto"));
        assert_eq!(spec.option, None);
    }

    #[test]
    fn test_bare_bool_is_checkbox() {
        assert_eq!(normalize("Enable", json!(false)).kind, ArgType::Checkbox);
    }

    #[test]
    fn test_options_infer_select() {
        let spec = normalize("Server", json!({"value": "cn", "option": ["cn", "en", "jp"]}));
        assert_eq!(spec.kind, ArgType::Select);
        assert_eq!(spec.option, Some(vec![json!("cn"), json!("en"), json!("jp")]));
    }

    #[test]
    fn test_two_boolean_options_infer_checkbox() {
        let spec = normalize("Toggle", json!({"value": null, "option": [true, false]}));
        assert_eq!(spec.kind, ArgType::Checkbox);
    }

    #[test]
    fn test_filter_and_long_text_infer_textarea() {
        assert_eq!(normalize("Filter", json!("a > b")).kind, ArgType::Textarea);
        assert_eq!(normalize("Note", json!("line one\nline two")).kind, ArgType::Textarea);
        assert_eq!(normalize("Note", json!("x".repeat(65))).kind, ArgType::Textarea);
        assert_eq!(normalize("Note", json!("x".repeat(64))).kind, ArgType::Input);
    }

    #[test]
    fn test_missing_value_defaults_to_empty_string() {
        let spec = normalize("Serial", json!({"type": "input"}));
        assert_eq!(spec.value, json!(""));
    }

    #[test]
    fn test_explicit_fields_win() {
        let spec = normalize(
            "Server",
            json!({"type": "input", "value": "cn", "option": ["cn", "en"], "display": "hide"}),
        );
        assert_eq!(spec.kind, ArgType::Input);
        assert_eq!(spec.extra.get("display"), Some(&json!("hide")));
    }

    #[test]
    fn test_unknown_type_falls_back_to_inferred() {
        let spec = normalize("Enable", json!({"type": "toggle", "value": true}));
        assert_eq!(spec.kind, ArgType::Checkbox);
    }

    #[test]
    fn test_serialized_field_order() {
        let spec = normalize("Server", json!({"value": "cn", "option": ["cn"], "display": "hide"}));
        let text = serde_json::to_string(&spec).unwrap();
        assert_eq!(
            text,
            r#"{"type":"select","value":"cn","option":["cn"],"display":"hide"}"#
        );
    }

    #[test]
    fn test_definitions_from_raw_preserve_order() {
        let raw = json!({
            "Scheduler": {"Enable": false, "Command": "Alas"},
            "Emulator": {"Server": {"value": "cn", "option": ["cn", "en"]}}
        });
        let definitions = ArgumentDefinitions::from_raw(&raw);
        let paths: Vec<String> = definitions.leaves().map(|(p, _)| p.to_string()).collect();
        assert_eq!(
            paths,
            vec!["Scheduler.Enable", "Scheduler.Command", "Emulator.Server"]
        );
        assert_eq!(
            definitions.get("Emulator", "Server").map(|s| s.kind),
            Some(ArgType::Select)
        );
    }

    #[test]
    fn test_allows() {
        let spec = normalize("Level", json!({"value": 1, "option": [1, 2, 3]}));
        assert!(spec.allows(&json!(2)));
        assert!(!spec.allows(&json!(5)));
        assert!(spec.allows(&json!(2.0)));
        assert_eq!(spec.matching_option(&json!(3.0)), Some(&json!(3)));
        assert!(normalize("Serial", json!("auto")).allows(&json!("anything")));
    }
}
