//! Outcomes of the usage policy that are not a plain success.

use std::fmt;

use thiserror::Error;

/// Which utilization metric a ceiling applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    Cpu,
    Mem,
}

impl MetricKind {
    pub const ALL: [MetricKind; 2] = [MetricKind::Cpu, MetricKind::Mem];

    /// Configuration key prefix for this metric, including the trailing dot.
    pub fn prefix(self) -> &'static str {
        match self {
            MetricKind::Cpu => "CpuUsageAvg.",
            MetricKind::Mem => "MemUsageAvg.",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Mem => "mem",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A node is infeasible for a task because one usage average is over its ceiling.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "task {task} is not allowed on node {node}: {metric} usage {observed} over {window} exceeds ceiling {ceiling}"
)]
pub struct RejectionReason {
    pub metric: MetricKind,
    pub window: String,
    pub observed: f64,
    pub ceiling: f64,
    pub task: String,
    pub node: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("node {node} reports non-finite cpu usage {value} for window {window}")]
    NonFiniteUsage {
        node: String,
        window: String,
        value: f64,
    },
}

/// Non-fatal problem found while reading plugin arguments.
///
/// The offending entry is skipped (or the default kept) and the rest of the
/// configuration still applies.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseWarning {
    #[error("ignoring threshold key `{key}`: expected a `CpuUsageAvg.` or `MemUsageAvg.` prefix")]
    UnknownKey { key: String },

    #[error("ignoring threshold key `{key}`: window label is empty")]
    EmptyWindow { key: String },

    #[error("{metric} threshold for window `{window}` set more than once, `{key}` wins")]
    DuplicateWindow {
        metric: MetricKind,
        window: String,
        key: String,
    },

    #[error("ignoring `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("ignoring `{key}` = {value}: ceilings must be finite and non-negative")]
    OutOfRange { key: String, value: f64 },
}
