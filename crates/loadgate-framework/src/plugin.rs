//! Plugin trait and the registry of plugin builders.

use std::collections::HashMap;

use tracing::debug;

use crate::arguments::Arguments;
use crate::config::PluginOption;
use crate::error::{FrameworkError, FrameworkResult};
use crate::session::Session;

/// A scheduling policy that attaches callbacks to a session.
pub trait Plugin: Send + Sync {
    /// Stable name used as the key for every callback the plugin registers.
    fn name(&self) -> &str;

    /// Register extension-point callbacks on the session.
    fn on_session_open(&self, ssn: &mut Session);

    /// Release per-session resources.
    fn on_session_close(&self, ssn: &mut Session);
}

/// Builds a plugin from its raw arguments.
///
/// Configuration problems are returned as human-readable warnings rather
/// than errors so a single bad entry never takes the scheduler down.
pub type PluginBuilder = fn(&Arguments) -> BuiltPlugin;

/// A freshly built plugin plus any warnings raised while reading its arguments.
pub struct BuiltPlugin {
    pub plugin: Box<dyn Plugin>,
    pub warnings: Vec<String>,
}

/// Name → builder lookup table.
#[derive(Default)]
pub struct PluginRegistry {
    builders: HashMap<String, PluginBuilder>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a builder. A second registration under the same name replaces the first.
    pub fn register(&mut self, name: &str, builder: PluginBuilder) {
        debug!(plugin = name, "registered plugin builder");
        self.builders.insert(name.to_string(), builder);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    pub fn build(&self, option: &PluginOption) -> FrameworkResult<BuiltPlugin> {
        let builder = self
            .builders
            .get(&option.name)
            .ok_or_else(|| FrameworkError::UnknownPlugin(option.name.clone()))?;
        Ok(builder(&option.arguments))
    }

    /// Build every configured plugin, stopping at the first unknown name.
    pub fn build_all(&self, options: &[PluginOption]) -> FrameworkResult<Vec<BuiltPlugin>> {
        options.iter().map(|o| self.build(o)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Plugin for Noop {
        fn name(&self) -> &str {
            "noop"
        }
        fn on_session_open(&self, _ssn: &mut Session) {}
        fn on_session_close(&self, _ssn: &mut Session) {}
    }

    fn build_noop(args: &Arguments) -> BuiltPlugin {
        let warnings = if args.is_empty() {
            Vec::new()
        } else {
            vec!["noop takes no arguments".to_string()]
        };
        BuiltPlugin {
            plugin: Box::new(Noop),
            warnings,
        }
    }

    #[test]
    fn build_registered_plugin() {
        let mut registry = PluginRegistry::new();
        registry.register("noop", build_noop);
        assert!(registry.contains("noop"));

        let mut arguments = Arguments::new();
        arguments.insert("x", 1i64);
        let built = registry
            .build(&PluginOption {
                name: "noop".to_string(),
                arguments,
            })
            .unwrap();
        assert_eq!(built.plugin.name(), "noop");
        assert_eq!(built.warnings.len(), 1);
    }

    #[test]
    fn unknown_plugin_is_an_error() {
        let registry = PluginRegistry::new();
        let result = registry.build(&PluginOption {
            name: "gang".to_string(),
            arguments: Arguments::new(),
        });
        assert!(matches!(result, Err(FrameworkError::UnknownPlugin(name)) if name == "gang"));
    }
}
