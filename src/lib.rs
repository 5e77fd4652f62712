//! Config Forge Library
//!
//! Compiles a layered task/argument schema into a canonical argument tree and
//! migrates per-installation user configs against it.

pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod events;
pub mod i18n;
pub mod logging;
pub mod migrate;
pub mod pipeline;
pub mod schema;
pub mod source;
pub mod store;
pub mod tree;
