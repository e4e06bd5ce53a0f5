//! Usage policy — admission and scoring from recent utilization averages.
//!
//! - **Filter**: reject a node when any configured usage average is strictly
//!   above its ceiling. Windows the node has not reported yet are skipped.
//! - **Score**: `weight * (1 - cpu_5m)`, so less loaded nodes rank higher.
//!   Nodes without a 5-minute CPU average get a neutral `0`.

use loadgate_framework::{Arguments, NodeInfo, TaskInfo};
use tracing::{debug, trace};

use crate::error::{MetricKind, ParseWarning, RejectionReason, ScoreError};
use crate::thresholds::{ThresholdConfig, parse_thresholds};

/// Name under which the policy registers its session callbacks.
pub const PLUGIN_NAME: &str = "usage";

/// Window whose CPU average drives the score.
pub const SCORE_WINDOW: &str = "5m";

pub const DEFAULT_WEIGHT: i32 = 1;

const THRESHOLD_SECTION: &str = "thresholds";
const WEIGHT_KEY: &str = "weight";
const LEGACY_WEIGHT_KEY: &str = "usage.weight";

/// Immutable after construction; share it freely across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct UsagePolicy {
    weight: i32,
    thresholds: ThresholdConfig,
}

impl Default for UsagePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT, ThresholdConfig::default())
    }
}

impl UsagePolicy {
    pub fn new(weight: i32, thresholds: ThresholdConfig) -> Self {
        Self { weight, thresholds }
    }

    /// Build the policy from raw plugin arguments.
    ///
    /// Recognized keys are `thresholds` (table) and `weight` (integer,
    /// default 1). `usage.weight` is accepted as an alias; `weight` takes
    /// precedence when both are present. Problems become warnings.
    pub fn from_arguments(args: &Arguments) -> (Self, Vec<ParseWarning>) {
        let mut warnings = Vec::new();

        let weight = resolve_weight(args, &mut warnings);

        let thresholds = match args.get_table(THRESHOLD_SECTION) {
            Ok(raw) => {
                let (thresholds, parse_warnings) = parse_thresholds(raw);
                warnings.extend(parse_warnings);
                thresholds
            }
            Err(e) => {
                warnings.push(ParseWarning::InvalidValue {
                    key: THRESHOLD_SECTION.to_string(),
                    reason: e.to_string(),
                });
                ThresholdConfig::default()
            }
        };

        (Self::new(weight, thresholds), warnings)
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Admission check for placing `task` on `node`.
    ///
    /// CPU ceilings are checked before memory, each in ascending window
    /// order; the first violation found is reported. A NaN observation never
    /// exceeds a ceiling and so does not reject, although [`Self::score`]
    /// refuses the same value.
    pub fn filter(&self, task: &TaskInfo, node: &NodeInfo) -> Result<(), RejectionReason> {
        for metric in MetricKind::ALL {
            let observed_avg = match metric {
                MetricKind::Cpu => &node.usage.cpu_usage_avg,
                MetricKind::Mem => &node.usage.mem_usage_avg,
            };

            for (window, &ceiling) in self.thresholds.ceilings(metric) {
                let Some(&observed) = observed_avg.get(window) else {
                    trace!(node = %node.name, %metric, window = %window, "no usage reported for window");
                    continue;
                };

                if observed.is_nan() {
                    trace!(node = %node.name, %metric, window = %window, "usage is NaN, not compared");
                    continue;
                }

                if observed > ceiling {
                    debug!(
                        task = %task,
                        node = %node.name,
                        %metric,
                        window = %window,
                        observed,
                        ceiling,
                        "usage filter rejected node"
                    );
                    return Err(RejectionReason {
                        metric,
                        window: window.clone(),
                        observed,
                        ceiling,
                        task: task.to_string(),
                        node: node.name.clone(),
                    });
                }
            }
        }

        debug!(task = %task, node = %node.name, "usage filter passed");
        Ok(())
    }

    /// Preference score for placing `task` on `node`. Higher is better.
    pub fn score(&self, task: &TaskInfo, node: &NodeInfo) -> Result<f64, ScoreError> {
        let Some(&cpu_usage) = node.usage.cpu_usage_avg.get(SCORE_WINDOW) else {
            trace!(task = %task, node = %node.name, "no cpu usage for score window, neutral score");
            return Ok(0.0);
        };

        if !cpu_usage.is_finite() {
            return Err(ScoreError::NonFiniteUsage {
                node: node.name.clone(),
                window: SCORE_WINDOW.to_string(),
                value: cpu_usage,
            });
        }

        let score = f64::from(self.weight) * (1.0 - cpu_usage);
        trace!(task = %task, node = %node.name, cpu_usage, score, "usage score");
        Ok(score)
    }
}

fn resolve_weight(args: &Arguments, warnings: &mut Vec<ParseWarning>) -> i32 {
    match args.get_i64(WEIGHT_KEY) {
        Ok(Some(w)) => return narrow_weight(WEIGHT_KEY, w, warnings),
        Ok(None) => {}
        Err(e) => {
            warnings.push(ParseWarning::InvalidValue {
                key: WEIGHT_KEY.to_string(),
                reason: e.to_string(),
            });
            return DEFAULT_WEIGHT;
        }
    }

    // Either `"usage.weight" = 2` or the nested table from `usage.weight = 2`.
    let legacy = args
        .get(LEGACY_WEIGHT_KEY)
        .or_else(|| args.get("usage").and_then(|u| u.get("weight")));

    match legacy {
        None => DEFAULT_WEIGHT,
        Some(toml::Value::Integer(w)) => narrow_weight(LEGACY_WEIGHT_KEY, *w, warnings),
        Some(other) => {
            warnings.push(ParseWarning::InvalidValue {
                key: LEGACY_WEIGHT_KEY.to_string(),
                reason: format!("expected an integer, found {}", other.type_str()),
            });
            DEFAULT_WEIGHT
        }
    }
}

fn narrow_weight(key: &str, weight: i64, warnings: &mut Vec<ParseWarning>) -> i32 {
    i32::try_from(weight).unwrap_or_else(|_| {
        warnings.push(ParseWarning::InvalidValue {
            key: key.to_string(),
            reason: format!("{weight} does not fit in a 32-bit weight"),
        });
        DEFAULT_WEIGHT
    })
}
