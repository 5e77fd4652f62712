//! Schema normalization and compilation.
//!
//! ```text
//!     task.yaml ---+
//! argument.yaml ---+-----> CompiledSchema (task -> group -> argument -> spec)
//! override.yaml ---+
//! ```

mod argument;
mod compiled;
mod compiler;
mod kind;

pub use argument::{ArgType, ArgumentDefinitions, ArgumentGroup, ArgumentSpec, RawArgument, infer_type};
pub use compiled::CompiledSchema;
pub use compiler::{Compilation, SchemaCompiler, TaskGrouping};
pub use kind::ValueKind;

/// Arguments whose values may legitimately be either numbers or strings.
pub const INTERVAL_ARGUMENTS: [&str; 2] = ["SuccessInterval", "FailureInterval"];

/// Whether `argument` tolerates a value kind different from its default.
pub fn tolerates_kind_drift(argument: &str) -> bool {
    INTERVAL_ARGUMENTS.contains(&argument)
}
