use super::argument::{ArgumentGroup, ArgumentSpec};
use crate::tree::Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The merged schema: `task -> group -> argument -> spec`.
///
/// Each task owns its own copy of every spec, so mutating one task's option
/// list never affects another task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledSchema {
    tasks: IndexMap<String, IndexMap<String, ArgumentGroup>>,
}

impl CompiledSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `arguments` under `task.group`, replacing any previous group.
    pub fn insert_group(&mut self, task: &str, group: &str, arguments: ArgumentGroup) {
        self.tasks
            .entry(task.to_string())
            .or_default()
            .insert(group.to_string(), arguments);
    }

    pub fn get(&self, task: &str, group: &str, argument: &str) -> Option<&ArgumentSpec> {
        self.tasks.get(task)?.get(group)?.get(argument)
    }

    pub fn get_mut(&mut self, task: &str, group: &str, argument: &str) -> Option<&mut ArgumentSpec> {
        self.tasks.get_mut(task)?.get_mut(group)?.get_mut(argument)
    }

    /// Look up a `task.group.argument` path.
    pub fn spec(&self, path: &Path) -> Option<&ArgumentSpec> {
        match path.segments() {
            [task, group, argument] => self.get(task, group, argument),
            _ => None,
        }
    }

    pub fn spec_mut(&mut self, path: &Path) -> Option<&mut ArgumentSpec> {
        match path.segments() {
            [task, group, argument] => self.get_mut(task, group, argument),
            _ => None,
        }
    }

    pub fn contains_task(&self, task: &str) -> bool {
        self.tasks.contains_key(task)
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Every `(task.group.argument, spec)` leaf in insertion order.
    pub fn leaves(&self) -> impl Iterator<Item = (Path, &ArgumentSpec)> {
        self.tasks.iter().flat_map(|(task, groups)| {
            groups.iter().flat_map(move |(group, arguments)| {
                arguments.iter().map(move |(argument, spec)| {
                    (
                        Path::from([task.as_str(), group.as_str(), argument.as_str()]),
                        spec,
                    )
                })
            })
        })
    }

    pub fn len(&self) -> usize {
        self.tasks
            .values()
            .flat_map(|groups| groups.values())
            .map(|arguments| arguments.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ArgType;
    use serde_json::{Map, json};

    fn spec(value: serde_json::Value) -> ArgumentSpec {
        ArgumentSpec {
            kind: ArgType::Input,
            value,
            option: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_groups_are_independent_copies() {
        let mut group = ArgumentGroup::new();
        group.insert("Name".into(), spec(json!("7-2")));

        let mut schema = CompiledSchema::new();
        schema.insert_group("Main", "Campaign", group.clone());
        schema.insert_group("Main2", "Campaign", group);

        schema.get_mut("Main", "Campaign", "Name").unwrap().value = json!("12-4");
        assert_eq!(schema.get("Main2", "Campaign", "Name").unwrap().value, json!("7-2"));
    }

    #[test]
    fn test_leaves_and_lookup() {
        let mut scheduler = ArgumentGroup::new();
        scheduler.insert("Enable".into(), spec(json!(false)));
        scheduler.insert("Command".into(), spec(json!("Alas")));
        let mut schema = CompiledSchema::new();
        schema.insert_group("Main", "Scheduler", scheduler);

        let paths: Vec<String> = schema.leaves().map(|(p, _)| p.to_string()).collect();
        assert_eq!(paths, vec!["Main.Scheduler.Enable", "Main.Scheduler.Command"]);
        assert_eq!(schema.len(), 2);
        assert!(schema.spec(&Path::parse("Main.Scheduler.Enable")).is_some());
        assert!(schema.spec(&Path::parse("Main.Scheduler")).is_none());
    }

    #[test]
    fn test_serializes_as_plain_tree() {
        let mut group = ArgumentGroup::new();
        group.insert("Name".into(), spec(json!("7-2")));
        let mut schema = CompiledSchema::new();
        schema.insert_group("Main", "Campaign", group);

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            value,
            json!({"Main": {"Campaign": {"Name": {"type": "input", "value": "7-2"}}}})
        );
        let back: CompiledSchema = serde_json::from_value(value).unwrap();
        assert_eq!(back, schema);
    }
}
