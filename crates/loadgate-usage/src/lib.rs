//! loadgate-usage — utilization-aware admission and node scoring.
//!
//! Keeps tasks off nodes whose recent CPU or memory averages are over a
//! configured ceiling, and ranks the remaining nodes by how idle their CPU
//! has been over the last five minutes.
//!
//! ```toml
//! [[plugins]]
//! name = "usage"
//! [plugins.arguments]
//! weight = 1
//! [plugins.arguments.thresholds]
//! "CpuUsageAvg.5m" = 0.80
//! "MemUsageAvg.5m" = 0.90
//! ```
//!
//! # Components
//!
//! - **`thresholds`** — parsing and validation of ceilings
//! - **`policy`** — `filter` and `score`
//! - **`plugin`** — session registration

pub mod error;
pub mod plugin;
pub mod policy;
pub mod thresholds;

pub use error::{MetricKind, ParseWarning, RejectionReason, ScoreError};
pub use plugin::UsagePlugin;
pub use policy::{DEFAULT_WEIGHT, PLUGIN_NAME, SCORE_WINDOW, UsagePolicy};
pub use thresholds::{ThresholdConfig, parse_thresholds};
