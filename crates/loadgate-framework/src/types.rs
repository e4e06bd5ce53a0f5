//! Domain types handed to plugins by the scheduling session.
//!
//! Tasks and nodes are read-only inputs: plugins inspect them but never
//! mutate them. Node usage is serializable so snapshots can be loaded from
//! JSON files by tooling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Name of a node in the cluster.
pub type NodeName = String;

/// Label of a utilization averaging window, e.g. `"5m"`.
pub type WindowLabel = String;

// ── Task ──────────────────────────────────────────────────────────

/// A workload task waiting for placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TaskInfo {
    pub uid: String,
    pub namespace: String,
    pub name: String,
}

impl TaskInfo {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let name = name.into();
        Self {
            uid: format!("{namespace}/{name}"),
            namespace,
            name,
        }
    }

    /// Parse `namespace/name`. A bare name lands in the `default` namespace.
    pub fn from_qualified(qualified: &str) -> Self {
        match qualified.split_once('/') {
            Some((ns, name)) => Self::new(ns, name),
            None => Self::new("default", qualified),
        }
    }
}

impl fmt::Display for TaskInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

// ── Node ──────────────────────────────────────────────────────────

/// Recent average utilization of a node, keyed by window label.
///
/// Values are fractions in `[0, 1]` as reported by the telemetry
/// collector. Windows that have not been measured yet are simply absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NodeUsage {
    #[serde(default)]
    pub cpu_usage_avg: HashMap<WindowLabel, f64>,
    #[serde(default)]
    pub mem_usage_avg: HashMap<WindowLabel, f64>,
}

impl NodeUsage {
    pub fn with_cpu(mut self, window: &str, value: f64) -> Self {
        self.cpu_usage_avg.insert(window.to_string(), value);
        self
    }

    pub fn with_mem(mut self, window: &str, value: f64) -> Self {
        self.mem_usage_avg.insert(window.to_string(), value);
        self
    }
}

/// A candidate node together with its latest usage snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NodeInfo {
    pub name: NodeName,
    #[serde(default)]
    pub usage: NodeUsage,
}

impl NodeInfo {
    pub fn new(name: impl Into<String>, usage: NodeUsage) -> Self {
        Self {
            name: name.into(),
            usage,
        }
    }
}
