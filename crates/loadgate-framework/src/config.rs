//! Scheduler configuration file parser.
//!
//! ```toml
//! [[plugins]]
//! name = "usage"
//! [plugins.arguments]
//! weight = 1
//! [plugins.arguments.thresholds]
//! "CpuUsageAvg.5m" = 0.80
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::arguments::Arguments;
use crate::error::{FrameworkError, FrameworkResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub plugins: Vec<PluginOption>,
}

/// One enabled plugin and its raw arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginOption {
    pub name: String,
    #[serde(default)]
    pub arguments: Arguments,
}

impl SchedulerConfig {
    pub fn from_file(path: &Path) -> FrameworkResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| FrameworkError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> FrameworkResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn plugin(&self, name: &str) -> Option<&PluginOption> {
        self.plugins.iter().find(|p| p.name == name)
    }
}
