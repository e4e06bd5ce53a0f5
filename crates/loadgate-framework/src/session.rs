//! Scheduling session — the extension points plugins attach to.
//!
//! A session owns the plugins opened for one scheduling cycle and the
//! callbacks they registered. Callbacks are `Send + Sync` so the session can
//! be shared by reference across worker threads evaluating (task, node) pairs.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{NodeOrderError, PredicateError};
use crate::plugin::Plugin;
use crate::types::{NodeInfo, TaskInfo};

/// Feasibility check for a (task, node) pair.
pub type PredicateFn = Arc<dyn Fn(&TaskInfo, &NodeInfo) -> Result<(), PredicateError> + Send + Sync>;

/// Preference score for a (task, node) pair. Higher is better.
pub type NodeOrderFn = Arc<dyn Fn(&TaskInfo, &NodeInfo) -> Result<f64, NodeOrderError> + Send + Sync>;

#[derive(Default)]
pub struct Session {
    plugins: Vec<Box<dyn Plugin>>,
    predicate_fns: Vec<(String, PredicateFn)>,
    node_order_fns: Vec<(String, NodeOrderFn)>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session and let every plugin register its callbacks.
    pub fn open(plugins: Vec<Box<dyn Plugin>>) -> Self {
        let mut ssn = Self::new();
        for plugin in &plugins {
            debug!(plugin = plugin.name(), "opening plugin");
            plugin.on_session_open(&mut ssn);
        }
        ssn.plugins = plugins;
        ssn
    }

    /// Close the session, notifying plugins in reverse open order.
    pub fn close(mut self) {
        let plugins = std::mem::take(&mut self.plugins);
        for plugin in plugins.iter().rev() {
            debug!(plugin = plugin.name(), "closing plugin");
            plugin.on_session_close(&mut self);
        }
    }

    pub fn add_predicate_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&TaskInfo, &NodeInfo) -> Result<(), PredicateError> + Send + Sync + 'static,
    {
        upsert(&mut self.predicate_fns, name, Arc::new(f));
    }

    pub fn add_node_order_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&TaskInfo, &NodeInfo) -> Result<f64, NodeOrderError> + Send + Sync + 'static,
    {
        upsert(&mut self.node_order_fns, name, Arc::new(f));
    }

    pub fn predicate_fn(&self, name: &str) -> Option<&PredicateFn> {
        self.predicate_fns.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn node_order_fn(&self, name: &str) -> Option<&NodeOrderFn> {
        self.node_order_fns.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|p| p.name())
    }

    /// Run every registered predicate in registration order; the first failure wins.
    pub fn predicate(&self, task: &TaskInfo, node: &NodeInfo) -> Result<(), PredicateError> {
        for (name, f) in &self.predicate_fns {
            trace!(plugin = %name, task = %task, node = %node.name, "running predicate");
            f(task, node)?;
        }
        Ok(())
    }

    /// Collect each plugin's score for the pair, in registration order.
    ///
    /// Scores are returned per plugin and never combined here.
    pub fn node_order(&self, task: &TaskInfo, node: &NodeInfo) -> Result<Vec<(String, f64)>, NodeOrderError> {
        self.node_order_fns
            .iter()
            .map(|(name, f)| f(task, node).map(|score| (name.clone(), score)))
            .collect()
    }
}

fn upsert<T>(slots: &mut Vec<(String, T)>, name: &str, value: T) {
    match slots.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = value,
        None => slots.push((name.to_string(), value)),
    }
}
