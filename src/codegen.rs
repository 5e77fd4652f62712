//! Emits Rust constants for every argument default.
//!
//! ```text
//! argument definitions ---> generated.rs
//! ```
//!
//! One `pub const` per `group.argument`, grouped under a banner comment per
//! group. Option lists are appended as trailing comments. The output depends
//! only on the definitions, so regenerating unchanged sources is byte-stable.

use crate::schema::{ArgumentDefinitions, ArgumentSpec};
use heck::ToShoutySnakeCase;
use serde_json::Value;
use std::fmt::Write;

const HEADER: &str = "\
// This file was generated by config-forge from the argument definitions.
// Do not modify it by hand.
";

/// Render the constants module.
pub fn emit(arguments: &ArgumentDefinitions) -> String {
    let mut out = String::from(HEADER);
    let mut last_group: Option<String> = None;

    for (path, spec) in arguments.leaves() {
        let [group, argument] = path.segments() else {
            continue;
        };
        if last_group.as_ref() != Some(group) {
            let _ = write!(out, "\n// Group `{group}`\n");
            last_group = Some(group.clone());
        }
        let _ = writeln!(out, "{}", constant(group, argument, spec));
    }
    out
}

/// Constant name of `group.argument`.
pub fn constant_name(group: &str, argument: &str) -> String {
    format!("{group}_{argument}").to_shouty_snake_case()
}

fn constant(group: &str, argument: &str, spec: &ArgumentSpec) -> String {
    let (ty, literal) = rust_literal(&spec.value);
    let mut line = format!("pub const {}: {ty} = {literal};", constant_name(group, argument));
    if let Some(options) = spec.option.as_deref().filter(|options| !options.is_empty()) {
        let options: Vec<String> = options.iter().map(display_value).collect();
        let _ = write!(line, "  // {}", options.join(", "));
    }
    line
}

/// Rust type and literal for a default value.
fn rust_literal(value: &Value) -> (&'static str, String) {
    match value {
        Value::Null => ("Option<&str>", "None".to_string()),
        Value::Bool(flag) => ("bool", flag.to_string()),
        Value::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(integer), _) => ("i64", integer.to_string()),
            (None, Some(float)) => ("f64", format!("{float:?}")),
            (None, None) => ("&str", format!("{:?}", number.to_string())),
        },
        Value::String(text) => ("&str", format!("{text:?}")),
        other => ("&str", format!("{:?}", other.to_string())),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
