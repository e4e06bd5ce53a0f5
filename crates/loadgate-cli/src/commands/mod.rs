pub mod evaluate;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use loadgate_framework::{PluginRegistry, SchedulerConfig, Session};
use loadgate_usage::UsagePlugin;

/// Every plugin this binary knows how to build.
fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    UsagePlugin::register(&mut registry);
    registry
}

/// Warnings raised while building one plugin.
pub struct PluginWarnings {
    pub plugin: String,
    pub warnings: Vec<String>,
}

/// Load the config file, build its plugins and open a session over them.
pub fn open_session(config_path: &Path) -> anyhow::Result<(Session, Vec<PluginWarnings>)> {
    let config = SchedulerConfig::from_file(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let built = registry().build_all(&config.plugins)?;

    let mut warnings = Vec::new();
    let mut plugins = Vec::with_capacity(built.len());
    for b in built {
        warnings.push(PluginWarnings {
            plugin: b.plugin.name().to_string(),
            warnings: b.warnings,
        });
        plugins.push(b.plugin);
    }

    Ok((Session::open(plugins), warnings))
}
