use std::path::Path;

use anyhow::Context;
use loadgate_framework::{NodeInfo, TaskInfo};
use serde::Serialize;

use super::open_session;

/// Predicate verdict and per-plugin scores for one node.
#[derive(Debug, Serialize)]
pub struct NodeVerdict {
    pub node: String,
    pub feasible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub scores: Vec<PluginScore>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PluginScore {
    pub plugin: String,
    pub score: f64,
}

pub fn evaluate(config: &str, nodes: &str, task: &str, format: &str) -> anyhow::Result<()> {
    let verdicts = evaluate_report(Path::new(config), Path::new(nodes), task)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&verdicts)?);
        }
        _ => {
            for v in &verdicts {
                println!("{}", text_line(v));
            }
        }
    }

    Ok(())
}

/// One line per node. A feasible node whose scoring failed still shows why.
fn text_line(v: &NodeVerdict) -> String {
    if !v.feasible {
        return format!("❌ {:<24} {}", v.node, v.reason.as_deref().unwrap_or("rejected"));
    }

    let mut line = format!("✅ {:<24}", v.node);
    for s in &v.scores {
        line.push_str(&format!(" {}={:.3}", s.plugin, s.score));
    }
    if let Some(reason) = &v.reason {
        line.push_str(&format!(" (scoring failed: {reason})"));
    }
    line
}

/// Run every node in the snapshot file through the configured session.
///
/// Only feasible nodes are scored. Nothing is ranked or selected.
pub fn evaluate_report(config: &Path, nodes: &Path, task: &str) -> anyhow::Result<Vec<NodeVerdict>> {
    let (ssn, _) = open_session(config)?;

    let content = std::fs::read_to_string(nodes)
        .with_context(|| format!("reading {}", nodes.display()))?;
    let snapshots: Vec<NodeInfo> = serde_json::from_str(&content)
        .with_context(|| format!("parsing node snapshots in {}", nodes.display()))?;

    let task = TaskInfo::from_qualified(task);
    tracing::info!(task = %task, nodes = snapshots.len(), "evaluating");

    let mut verdicts = Vec::with_capacity(snapshots.len());
    for node in &snapshots {
        let verdict = match ssn.predicate(&task, node) {
            Err(e) => NodeVerdict {
                node: node.name.clone(),
                feasible: false,
                reason: Some(e.to_string()),
                scores: Vec::new(),
            },
            Ok(()) => match ssn.node_order(&task, node) {
                Ok(scores) => NodeVerdict {
                    node: node.name.clone(),
                    feasible: true,
                    reason: None,
                    scores: scores
                        .into_iter()
                        .map(|(plugin, score)| PluginScore { plugin, score })
                        .collect(),
                },
                Err(e) => NodeVerdict {
                    node: node.name.clone(),
                    feasible: true,
                    reason: Some(e.to_string()),
                    scores: Vec::new(),
                },
            },
        };
        verdicts.push(verdict);
    }

    ssn.close();
    Ok(verdicts)
}
