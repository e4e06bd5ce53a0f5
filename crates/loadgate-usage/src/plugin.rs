//! Session adapter for [`UsagePolicy`].

use std::sync::Arc;

use loadgate_framework::{
    Arguments, BuiltPlugin, NodeOrderError, Plugin, PluginBuilder, PluginRegistry, PredicateError,
    Session,
};
use tracing::{debug, warn};

use crate::error::ParseWarning;
use crate::policy::{PLUGIN_NAME, UsagePolicy};

/// Registers the usage filter as a predicate and the usage score as a
/// node-order function.
#[derive(Debug, Clone)]
pub struct UsagePlugin {
    policy: Arc<UsagePolicy>,
}

impl UsagePlugin {
    /// Build from plugin arguments. Warnings are logged and returned.
    pub fn new(args: &Arguments) -> (Self, Vec<ParseWarning>) {
        let (policy, warnings) = UsagePolicy::from_arguments(args);
        for w in &warnings {
            warn!(plugin = PLUGIN_NAME, warning = %w, "usage plugin configuration");
        }
        debug!(
            plugin = PLUGIN_NAME,
            weight = policy.weight(),
            thresholds = policy.thresholds().len(),
            "usage plugin configured"
        );
        (Self::from_policy(policy), warnings)
    }

    pub fn from_policy(policy: UsagePolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &UsagePolicy {
        &self.policy
    }

    pub fn builder() -> PluginBuilder {
        build
    }

    pub fn register(registry: &mut PluginRegistry) {
        registry.register(PLUGIN_NAME, Self::builder());
    }
}

fn build(args: &Arguments) -> BuiltPlugin {
    let (plugin, warnings) = UsagePlugin::new(args);
    BuiltPlugin {
        plugin: Box::new(plugin),
        warnings: warnings.iter().map(ToString::to_string).collect(),
    }
}

impl Plugin for UsagePlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn on_session_open(&self, ssn: &mut Session) {
        debug!("enter usage plugin");

        let policy = Arc::clone(&self.policy);
        ssn.add_predicate_fn(PLUGIN_NAME, move |task, node| {
            policy
                .filter(task, node)
                .map_err(|reason| PredicateError::Unschedulable {
                    plugin: PLUGIN_NAME.to_string(),
                    reason: Box::new(reason),
                })
        });

        let policy = Arc::clone(&self.policy);
        ssn.add_node_order_fn(PLUGIN_NAME, move |task, node| {
            policy.score(task, node).map_err(|e| NodeOrderError {
                plugin: PLUGIN_NAME.to_string(),
                source: Box::new(e),
            })
        });

        debug!("leaving usage plugin");
    }

    fn on_session_close(&self, _ssn: &mut Session) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadgate_framework::{NodeInfo, NodeUsage, TaskInfo};

    #[test]
    fn builder_reports_rendered_warnings() {
        let mut args = Arguments::new();
        args.insert("weight", "heavy");
        let built = build(&args);
        assert_eq!(built.plugin.name(), PLUGIN_NAME);
        assert_eq!(built.warnings.len(), 1);
        assert!(built.warnings[0].contains("weight"));
    }

    #[test]
    fn close_leaves_callbacks_in_place() {
        let plugin = UsagePlugin::from_policy(UsagePolicy::default());
        let mut ssn = Session::new();
        plugin.on_session_open(&mut ssn);
        plugin.on_session_close(&mut ssn);

        let node = NodeInfo::new("n1", NodeUsage::default().with_cpu("5m", 0.5));
        let scores = ssn.node_order(&TaskInfo::default(), &node).unwrap();
        assert_eq!(scores, vec![(PLUGIN_NAME.to_string(), 0.5)]);
    }
}
