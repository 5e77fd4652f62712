//! Deep-path operations over nested JSON mappings.
//!
//! Every schema, user config and translation file is a tree of objects addressed
//! by a [`Path`]. The functions here never fail on a missing path: reads fall
//! back to `None`, writes create whatever intermediate objects they need.

mod merge;
mod path;

pub use merge::{deep_merge, deep_merge_all};
pub use path::Path;

use serde_json::{Map, Value};

/// Look up the value at `path`.
///
/// Returns `None` the moment a segment is missing or a non-object would have
/// to be indexed further.
pub fn get<'a, S: AsRef<str>>(tree: &'a Value, path: &[S]) -> Option<&'a Value> {
    path.iter()
        .try_fold(tree, |node, segment| node.as_object()?.get(segment.as_ref()))
}

/// Look up the value at `path` inside an object's fields.
pub fn get_in<'a, S: AsRef<str>>(map: &'a Map<String, Value>, path: &[S]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    get(map.get(first.as_ref())?, rest)
}

/// Look up the value at `path`, cloning `default` when it is absent.
pub fn get_or<S: AsRef<str>>(tree: &Value, path: &[S], default: Value) -> Value {
    get(tree, path).cloned().unwrap_or(default)
}

/// Write `value` at `path`, creating intermediate objects as needed.
///
/// A non-object found where an intermediate object is required is replaced.
/// An empty path replaces the whole tree.
pub fn set<S: AsRef<str>>(tree: &mut Value, path: &[S], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *tree = value;
        return;
    };
    let mut node = tree;
    for segment in parents {
        node = as_object_mut(node)
            .entry(segment.as_ref())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    as_object_mut(node).insert(last.as_ref().to_string(), value);
}

/// Write `value` at `path` unless something is already there.
///
/// A stored `null` counts as absent. Returns whether the write happened.
pub fn set_if_absent<S: AsRef<str>>(tree: &mut Value, path: &[S], value: Value) -> bool {
    match get(tree, path) {
        Some(existing) if !existing.is_null() => false,
        _ => {
            set(tree, path, value);
            true
        }
    }
}

/// [`set_if_absent`] for an object's fields.
pub fn set_in_if_absent<S: AsRef<str>>(
    map: &mut Map<String, Value>,
    path: &[S],
    value: Value,
) -> bool {
    let mut tree = Value::Object(std::mem::take(map));
    let written = set_if_absent(&mut tree, path, value);
    if let Value::Object(restored) = tree {
        *map = restored;
    }
    written
}

/// Enumerate every `(path, value)` pair whose path is exactly `depth` long.
///
/// Values at `depth` are yielded whatever their own shape; leaves found above
/// `depth` are skipped. Each call walks the tree afresh.
pub fn iter(tree: &Value, depth: usize) -> DeepIter<'_> {
    let stack = match tree {
        Value::Object(map) if depth > 0 => vec![map.iter()],
        _ => Vec::new(),
    };
    DeepIter {
        depth,
        stack,
        prefix: Vec::new(),
    }
}

/// Depth-first iterator returned by [`iter`], in insertion order.
pub struct DeepIter<'a> {
    depth: usize,
    stack: Vec<serde_json::map::Iter<'a>>,
    prefix: Vec<String>,
}

impl<'a> Iterator for DeepIter<'a> {
    type Item = (Path, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.len();
            let entries = self.stack.last_mut()?;
            match entries.next() {
                None => {
                    self.stack.pop();
                    self.prefix.pop();
                }
                Some((key, value)) if level == self.depth => {
                    let mut segments = self.prefix.clone();
                    segments.push(key.clone());
                    return Some((Path::from(segments), value));
                }
                Some((key, Value::Object(children))) => {
                    self.prefix.push(key.clone());
                    self.stack.push(children.iter());
                }
                Some(_) => {}
            }
        }
    }
}

fn as_object_mut(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_nested() {
        let tree = json!({"Alas": {"Emulator": {"Server": "en"}}});
        assert_eq!(get(&tree, &["Alas", "Emulator", "Server"]), Some(&json!("en")));
        assert_eq!(get(&tree, &["Alas", "Emulator"]), Some(&json!({"Server": "en"})));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let tree = json!({"Alas": {"Emulator": {"Server": "en"}}});
        assert_eq!(get(&tree, &["Alas", "Optimization"]), None);
        // Indexing past a leaf
        assert_eq!(get(&tree, &["Alas", "Emulator", "Server", "deeper"]), None);
        assert_eq!(get_or(&tree, &["Nope"], json!("cn")), json!("cn"));
    }

    #[test]
    fn test_empty_path_is_root() {
        let tree = json!({"a": 1});
        let empty: [&str; 0] = [];
        assert_eq!(get(&tree, &empty), Some(&tree));
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut tree = json!({});
        set(&mut tree, &["Main", "Campaign", "Name"], json!("7-2"));
        assert_eq!(tree, json!({"Main": {"Campaign": {"Name": "7-2"}}}));
    }

    #[test]
    fn test_set_overwrites_leaf_intermediate() {
        let mut tree = json!({"Main": {"Campaign": 3}});
        set(&mut tree, &["Main", "Campaign", "Name"], json!("7-2"));
        assert_eq!(tree, json!({"Main": {"Campaign": {"Name": "7-2"}}}));
    }

    #[test]
    fn test_set_on_non_object_root() {
        let mut tree = Value::Null;
        set(&mut tree, &["a"], json!(1));
        assert_eq!(tree, json!({"a": 1}));
    }

    #[test]
    fn test_set_if_absent() {
        let mut tree = json!({"a": {"b": 1, "c": null}});
        assert!(!set_if_absent(&mut tree, &["a", "b"], json!(2)));
        assert!(set_if_absent(&mut tree, &["a", "c"], json!(3)));
        assert!(set_if_absent(&mut tree, &["a", "d"], json!(4)));
        assert_eq!(tree, json!({"a": {"b": 1, "c": 3, "d": 4}}));
    }

    #[test]
    fn test_set_in_if_absent_on_map() {
        let mut map = Map::new();
        map.insert("en".to_string(), json!("Winter Raid"));
        assert!(!set_in_if_absent(&mut map, &["en"], json!("Other")));
        assert!(set_in_if_absent(&mut map, &["current", "en"], json!("raid_001")));
        assert_eq!(get_in(&map, &["current", "en"]), Some(&json!("raid_001")));
        assert_eq!(get_in(&map, &["en"]), Some(&json!("Winter Raid")));
    }

    #[test]
    fn test_iter_exact_depth() {
        let tree = json!({
            "Alas": {"Emulator": {"Serial": "auto", "Server": "cn"}},
            "Main": {"Campaign": {"Name": "7-2"}}
        });
        let paths: Vec<String> = iter(&tree, 3).map(|(p, _)| p.to_string()).collect();
        assert_eq!(
            paths,
            vec!["Alas.Emulator.Serial", "Alas.Emulator.Server", "Main.Campaign.Name"]
        );
    }

    #[test]
    fn test_iter_does_not_descend_past_depth() {
        let tree = json!({"Group": {"Arg": {"value": 1, "option": [1, 2]}}});
        let items: Vec<(Path, &Value)> = iter(&tree, 2).collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0.to_string(), "Group.Arg");
        assert_eq!(items[0].1, &json!({"value": 1, "option": [1, 2]}));
    }

    #[test]
    fn test_iter_skips_shallow_leaves() {
        let tree = json!({"Task": {"Group": 5, "Other": {"Arg": true}}});
        let paths: Vec<String> = iter(&tree, 3).map(|(p, _)| p.to_string()).collect();
        assert_eq!(paths, vec!["Task.Other.Arg"]);
    }

    #[test]
    fn test_iter_is_restartable() {
        let tree = json!({"a": {"b": 1}, "c": {"d": 2}});
        let first: Vec<Path> = iter(&tree, 2).map(|(p, _)| p).collect();
        let second: Vec<Path> = iter(&tree, 2).map(|(p, _)| p).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_iter_zero_depth_or_leaf_root() {
        assert_eq!(iter(&json!({"a": 1}), 0).count(), 0);
        assert_eq!(iter(&json!(42), 2).count(), 0);
    }
}
