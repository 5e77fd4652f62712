//! Redirections: carrying values from old schema locations to new ones.

use super::coerce::coerce;
use crate::schema::{ArgType, CompiledSchema};
use crate::tree::{self, Path};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Pure conversion applied to a redirected value.
pub type Transform = fn(&Value) -> Result<Value, TransformError>;

/// A transform could not handle the value it was given.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransformError(pub String);

/// What applying a rule did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOutcome {
    Applied,
    /// The prior config never had the source field.
    SourceAbsent,
    TransformFailed,
    /// The target is not a leaf of the schema.
    TargetUnknown,
    /// The target is fixed by the schema.
    TargetDisabled,
}

/// Move a value from `source` in the prior config to `target` in the new one.
#[derive(Clone)]
pub struct RedirectionRule {
    pub source: Path,
    pub target: Path,
    pub transform: Option<Transform>,
}

impl RedirectionRule {
    pub fn new(source: impl Into<Path>, target: impl Into<Path>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Read from `old`, write into `new`.
    ///
    /// An absent or null source is a silent no-op. A failing transform skips
    /// the rule and leaves `new` untouched. The target must be a leaf of
    /// `schema` that is not disabled; the value is coerced to it like any
    /// migrated value.
    pub fn apply(&self, schema: &CompiledSchema, old: &Value, new: &mut Value) -> RedirectOutcome {
        let Some(value) = tree::get(old, self.source.segments()).filter(|v| !v.is_null()) else {
            return RedirectOutcome::SourceAbsent;
        };
        let Some(target) = schema.spec(&self.target) else {
            debug!(target = %self.target, "Redirection skipped: no such argument");
            return RedirectOutcome::TargetUnknown;
        };
        if target.kind == ArgType::Disable {
            debug!(target = %self.target, "Redirection skipped: target is disabled");
            return RedirectOutcome::TargetDisabled;
        }
        let value = match self.transform {
            None => value.clone(),
            Some(transform) => match transform(value) {
                Ok(converted) => converted,
                Err(err) => {
                    warn!(source = %self.source, target = %self.target, "Redirection skipped: {err}");
                    return RedirectOutcome::TransformFailed;
                }
            },
        };
        let value = coerce(self.target.last().unwrap_or_default(), value, target);
        debug!(source = %self.source, target = %self.target, "Redirected setting");
        tree::set(new, self.target.segments(), value);
        RedirectOutcome::Applied
    }
}

impl fmt::Debug for RedirectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedirectionRule")
            .field("source", &self.source.to_string())
            .field("target", &self.target.to_string())
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Apply `rules` in declaration order; a later rule writing the same target
/// wins. Returns how many rules applied.
pub fn apply_all(
    rules: &[RedirectionRule],
    schema: &CompiledSchema,
    old: &Value,
    new: &mut Value,
) -> usize {
    rules
        .iter()
        .filter(|rule| rule.apply(schema, old, new) == RedirectOutcome::Applied)
        .count()
}

/// Settings renamed across past schema versions.
///
/// The third rule reads what the first one writes, so a config migrated with
/// this table and migrated again moves `OpsiShop.Scheduler.Enable` into
/// `OpsiShop.OpsiShop.BuySupply` a second time. Replaying the table is only
/// stable once the prior config no longer has the old values.
pub fn builtin_rules() -> Vec<RedirectionRule> {
    vec![
        RedirectionRule::new("OpsiDaily.OpsiDaily.BuySupply", "OpsiShop.Scheduler.Enable"),
        RedirectionRule::new("OpsiDaily.Scheduler.Enable", "OpsiDaily.OpsiDaily.DoMission"),
        RedirectionRule::new("OpsiShop.Scheduler.Enable", "OpsiShop.OpsiShop.BuySupply"),
    ]
}
