//! loadgate-framework — the contract between a scheduling session and its plugins.
//!
//! The session owns nothing but callbacks: plugins register predicate and
//! node-order functions under their name when the session opens, and the
//! session invokes them per (task, node) pair. Combining scores and picking
//! a node is left to the caller.
//!
//! # Components
//!
//! - **`types`** — `TaskInfo`, `NodeInfo`, `NodeUsage`
//! - **`arguments`** — typed view over raw plugin arguments
//! - **`config`** — scheduler configuration file (`[[plugins]]`)
//! - **`plugin`** — `Plugin` trait and `PluginRegistry`
//! - **`session`** — extension points and their invocation

pub mod arguments;
pub mod config;
pub mod error;
pub mod plugin;
pub mod session;
pub mod types;

pub use arguments::Arguments;
pub use config::{PluginOption, SchedulerConfig};
pub use error::{ArgumentError, FrameworkError, FrameworkResult, NodeOrderError, PredicateError};
pub use plugin::{BuiltPlugin, Plugin, PluginBuilder, PluginRegistry};
pub use session::{NodeOrderFn, PredicateFn, Session};
pub use types::*;
