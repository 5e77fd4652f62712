//! Merges task grouping, argument definitions and overrides.

use super::argument::{ArgType, ArgumentDefinitions};
use super::compiled::CompiledSchema;
use super::kind::ValueKind;
use super::tolerates_kind_drift;
use crate::error::SchemaIssue;
use crate::tree;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

/// `task -> [group]`, in file order.
pub type TaskGrouping = IndexMap<String, Vec<String>>;

/// Outcome of a compile: the best-effort schema plus everything rejected on
/// the way.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub schema: CompiledSchema,
    pub issues: Vec<SchemaIssue>,
}

/// Builds a [`CompiledSchema`] from the three schema sources.
///
/// Never fails: every inconsistency is logged, recorded as a
/// [`SchemaIssue`] and skipped.
#[derive(Debug, Clone, Copy)]
pub struct SchemaCompiler<'a> {
    tasks: &'a TaskGrouping,
    arguments: &'a ArgumentDefinitions,
    overrides: Option<&'a Value>,
}

impl<'a> SchemaCompiler<'a> {
    pub fn new(tasks: &'a TaskGrouping, arguments: &'a ArgumentDefinitions) -> Self {
        Self {
            tasks,
            arguments,
            overrides: None,
        }
    }

    /// Override tree, `task -> group -> argument -> value`.
    pub fn with_overrides(mut self, overrides: &'a Value) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn compile(&self) -> Compilation {
        let mut compilation = Compilation::default();
        self.assemble(&mut compilation);
        if let Some(overrides) = self.overrides {
            Self::apply_overrides(overrides, &mut compilation);
        }
        self.derive_commands(&mut compilation.schema);
        debug!(
            tasks = self.tasks.len(),
            arguments = compilation.schema.len(),
            issues = compilation.issues.len(),
            "Compiled schema"
        );
        compilation
    }

    fn assemble(&self, compilation: &mut Compilation) {
        for (task, groups) in self.tasks {
            for group in groups {
                match self.arguments.group(group) {
                    Some(arguments) => {
                        compilation
                            .schema
                            .insert_group(task, group, arguments.clone());
                    }
                    None => report(
                        compilation,
                        SchemaIssue::MissingGroup {
                            task: task.clone(),
                            group: group.clone(),
                        },
                    ),
                }
            }
        }
    }

    fn apply_overrides(overrides: &Value, compilation: &mut Compilation) {
        for (path, value) in tree::iter(overrides, 3) {
            let Some(spec) = compilation.schema.spec_mut(&path) else {
                report(compilation, SchemaIssue::UnknownOverride { path });
                continue;
            };

            let expected = spec.value_kind();
            let found = ValueKind::of(value);
            let argument = path.last().unwrap_or_default();
            if found != expected && !tolerates_kind_drift(argument) {
                report(
                    compilation,
                    SchemaIssue::OverrideTypeMismatch {
                        path,
                        value: value.clone(),
                        found,
                        expected,
                    },
                );
                continue;
            }

            if !spec.allows(value) {
                report(
                    compilation,
                    SchemaIssue::OverrideNotAnOption {
                        path,
                        value: value.clone(),
                    },
                );
                continue;
            }

            spec.value = value.clone();
            spec.kind = ArgType::Disable;
        }
    }

    /// Every task's scheduler command is the task's own name.
    fn derive_commands(&self, schema: &mut CompiledSchema) {
        for task in self.tasks.keys() {
            if let Some(command) = schema.get_mut(task, "Scheduler", "Command") {
                command.value = Value::String(task.clone());
                command.kind = ArgType::Disable;
            }
        }
    }
}

fn report(compilation: &mut Compilation, issue: SchemaIssue) {
    warn!("{issue}");
    compilation.issues.push(issue);
}
