//! Threshold configuration: per-metric, per-window utilization ceilings.
//!
//! Raw arguments arrive as a flat table of `<Prefix>.<window>` keys:
//!
//! ```toml
//! [thresholds]
//! "CpuUsageAvg.5m" = 0.80
//! "MemUsageAvg.5m" = "90%"
//! ```
//!
//! Parsing never fails. Anything that cannot be turned into a ceiling is
//! reported as a [`ParseWarning`] and left out.

use std::collections::BTreeMap;

use crate::error::{MetricKind, ParseWarning};

/// Immutable ceilings for CPU and memory, keyed by window label.
///
/// Both maps always exist; an empty map means "no ceiling for this metric".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdConfig {
    cpu_usage_avg: BTreeMap<String, f64>,
    mem_usage_avg: BTreeMap<String, f64>,
}

impl ThresholdConfig {
    /// Ceilings for one metric, in ascending window-label order.
    pub fn ceilings(&self, metric: MetricKind) -> &BTreeMap<String, f64> {
        match metric {
            MetricKind::Cpu => &self.cpu_usage_avg,
            MetricKind::Mem => &self.mem_usage_avg,
        }
    }

    pub fn ceiling(&self, metric: MetricKind, window: &str) -> Option<f64> {
        self.ceilings(metric).get(window).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu_usage_avg.is_empty() && self.mem_usage_avg.is_empty()
    }

    /// Total number of ceilings across both metrics.
    pub fn len(&self) -> usize {
        self.cpu_usage_avg.len() + self.mem_usage_avg.len()
    }

    /// Build from `(key, value)` pairs in the given order.
    ///
    /// When two keys resolve to the same window the later one wins.
    pub fn from_entries<'a, K, I>(entries: I) -> (Self, Vec<ParseWarning>)
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, &'a toml::Value)>,
    {
        let mut config = ThresholdConfig::default();
        let mut warnings = Vec::new();

        for (key, value) in entries {
            let key = key.as_ref();

            let Some((metric, window)) = split_key(key) else {
                warnings.push(ParseWarning::UnknownKey { key: key.to_string() });
                continue;
            };

            if window.is_empty() {
                warnings.push(ParseWarning::EmptyWindow { key: key.to_string() });
                continue;
            }

            let ceiling = match ceiling_value(key, value) {
                Ok(c) => c,
                Err(w) => {
                    warnings.push(w);
                    continue;
                }
            };

            let slot = match metric {
                MetricKind::Cpu => &mut config.cpu_usage_avg,
                MetricKind::Mem => &mut config.mem_usage_avg,
            };
            if slot.insert(window.to_string(), ceiling).is_some() {
                warnings.push(ParseWarning::DuplicateWindow {
                    metric,
                    window: window.to_string(),
                    key: key.to_string(),
                });
            }
        }

        (config, warnings)
    }
}

/// Parse the `thresholds` section of the plugin arguments.
///
/// `None` (section absent) yields an empty configuration. An unquoted
/// dotted TOML key (`CpuUsageAvg.5m = 0.8`) arrives as a table under the
/// bare metric name; only that one level is expanded, so both spellings are
/// equivalent. Expanded entries are applied before quoted ones, which makes
/// the quoted spelling win when both name the same window.
pub fn parse_thresholds(raw: Option<&toml::Table>) -> (ThresholdConfig, Vec<ParseWarning>) {
    let Some(table) = raw else {
        return (ThresholdConfig::default(), Vec::new());
    };

    let mut dotted = Vec::new();
    let mut quoted = Vec::new();
    let mut warnings = Vec::new();

    for (key, value) in table {
        match (metric_name(key), value) {
            (Some(metric), toml::Value::Table(windows)) => {
                if windows.is_empty() {
                    warnings.push(ParseWarning::InvalidValue {
                        key: key.clone(),
                        reason: "no windows configured".to_string(),
                    });
                }
                for (window, v) in windows {
                    dotted.push((format!("{}{window}", metric.prefix()), v));
                }
            }
            _ => quoted.push((key.clone(), value)),
        }
    }

    let (config, entry_warnings) = ThresholdConfig::from_entries(dotted.into_iter().chain(quoted));
    warnings.extend(entry_warnings);
    (config, warnings)
}

/// A key that is exactly a metric prefix without its trailing dot.
fn metric_name(key: &str) -> Option<MetricKind> {
    MetricKind::ALL
        .into_iter()
        .find(|m| m.prefix().strip_suffix('.') == Some(key))
}

fn split_key(key: &str) -> Option<(MetricKind, &str)> {
    MetricKind::ALL
        .into_iter()
        .find_map(|m| key.strip_prefix(m.prefix()).map(|rest| (m, rest.trim())))
}

/// Numbers pass through unchanged; strings may carry a number or a
/// percentage (`"80%"` is read as `0.80`).
fn ceiling_value(key: &str, value: &toml::Value) -> Result<f64, ParseWarning> {
    let ceiling = match value {
        toml::Value::Integer(i) => *i as f64,
        toml::Value::Float(f) => *f,
        toml::Value::String(s) => parse_numeric(s).ok_or_else(|| ParseWarning::InvalidValue {
            key: key.to_string(),
            reason: format!("`{s}` is not a number or percentage"),
        })?,
        other => {
            return Err(ParseWarning::InvalidValue {
                key: key.to_string(),
                reason: format!("expected a number, found {}", other.type_str()),
            });
        }
    };

    if !ceiling.is_finite() || ceiling < 0.0 {
        return Err(ParseWarning::OutOfRange {
            key: key.to_string(),
            value: ceiling,
        });
    }
    Ok(ceiling)
}

fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    match s.strip_suffix('%') {
        Some(pct) => pct.trim_end().parse::<f64>().ok().map(|v| v / 100.0),
        None => s.parse::<f64>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(src: &str) -> toml::Table {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn absent_section_is_empty() {
        let (config, warnings) = parse_thresholds(None);
        assert!(config.is_empty());
        assert!(config.ceilings(MetricKind::Cpu).is_empty());
        assert!(config.ceilings(MetricKind::Mem).is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn prefixes_route_to_their_metric() {
        let raw = table(
            r#"
"CpuUsageAvg.5m" = 0.8
"CpuUsageAvg.10m" = 0.7
"MemUsageAvg.5m" = 0.9
"#,
        );
        let (config, warnings) = parse_thresholds(Some(&raw));

        assert!(warnings.is_empty());
        assert_eq!(config.len(), 3);
        assert_eq!(config.ceiling(MetricKind::Cpu, "5m"), Some(0.8));
        assert_eq!(config.ceiling(MetricKind::Cpu, "10m"), Some(0.7));
        assert_eq!(config.ceiling(MetricKind::Mem, "5m"), Some(0.9));
        assert_eq!(config.ceiling(MetricKind::Mem, "10m"), None);
    }

    #[test]
    fn unknown_prefix_warns_and_is_dropped() {
        let raw = table(r#""Foo.5m" = 10"#);
        let (config, warnings) = parse_thresholds(Some(&raw));

        assert!(config.is_empty());
        assert_eq!(warnings, vec![ParseWarning::UnknownKey { key: "Foo.5m".to_string() }]);
    }

    #[test]
    fn prefix_must_lead_the_key() {
        let raw = table(r#""xCpuUsageAvg.5m" = 0.5"#);
        let (config, warnings) = parse_thresholds(Some(&raw));
        assert!(config.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn unquoted_dotted_keys_are_flattened() {
        let raw = table(
            r#"
CpuUsageAvg.5m = 0.8
MemUsageAvg.1h = 0.95
"#,
        );
        let (config, warnings) = parse_thresholds(Some(&raw));

        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.ceiling(MetricKind::Cpu, "5m"), Some(0.8));
        assert_eq!(config.ceiling(MetricKind::Mem, "1h"), Some(0.95));
    }

    #[test]
    fn table_value_under_full_key_is_invalid() {
        let raw = table(r#""CpuUsageAvg.5m" = {}"#);
        let (config, warnings) = parse_thresholds(Some(&raw));
        assert!(config.is_empty());
        assert!(matches!(
            warnings.as_slice(),
            [ParseWarning::InvalidValue { key, .. }] if key == "CpuUsageAvg.5m"
        ));

        let raw = table(r#""CpuUsageAvg.5m" = { limit = 0.8 }"#);
        let (config, warnings) = parse_thresholds(Some(&raw));
        assert!(config.is_empty());
        assert_eq!(config.ceiling(MetricKind::Cpu, "5m.limit"), None);
        assert!(matches!(
            warnings.as_slice(),
            [ParseWarning::InvalidValue { key, .. }] if key == "CpuUsageAvg.5m"
        ));
    }

    #[test]
    fn only_one_level_of_dotted_keys_is_expanded() {
        let raw = table("CpuUsageAvg.5m.limit = 0.8");
        let (config, warnings) = parse_thresholds(Some(&raw));
        assert!(config.is_empty());
        assert!(matches!(
            warnings.as_slice(),
            [ParseWarning::InvalidValue { key, .. }] if key == "CpuUsageAvg.5m"
        ));
    }

    #[test]
    fn empty_metric_table_warns() {
        let raw = table("[MemUsageAvg]");
        let (config, warnings) = parse_thresholds(Some(&raw));
        assert!(config.is_empty());
        assert!(matches!(
            warnings.as_slice(),
            [ParseWarning::InvalidValue { key, .. }] if key == "MemUsageAvg"
        ));
    }

    #[test]
    fn quoted_key_wins_over_dotted_spelling() {
        let raw = table(
            r#"
"CpuUsageAvg.5m" = 0.5
CpuUsageAvg.5m = 0.7
"#,
        );
        let (config, warnings) = parse_thresholds(Some(&raw));

        assert_eq!(config.ceiling(MetricKind::Cpu, "5m"), Some(0.5));
        let duplicates = warnings
            .iter()
            .filter(|w| matches!(w, ParseWarning::DuplicateWindow { metric: MetricKind::Cpu, window, .. } if window == "5m"))
            .count();
        assert_eq!(duplicates, 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn string_values_accept_numbers_and_percentages() {
        let raw = table(
            r#"
"CpuUsageAvg.5m" = "80%"
"CpuUsageAvg.10m" = " 0.65 "
"MemUsageAvg.5m" = 1
"#,
        );
        let (config, warnings) = parse_thresholds(Some(&raw));

        assert!(warnings.is_empty());
        assert_eq!(config.ceiling(MetricKind::Cpu, "5m"), Some(0.8));
        assert_eq!(config.ceiling(MetricKind::Cpu, "10m"), Some(0.65));
        assert_eq!(config.ceiling(MetricKind::Mem, "5m"), Some(1.0));
    }

    #[test]
    fn values_above_one_are_legal() {
        let raw = table(r#""CpuUsageAvg.5m" = 150"#);
        let (config, warnings) = parse_thresholds(Some(&raw));
        assert!(warnings.is_empty());
        assert_eq!(config.ceiling(MetricKind::Cpu, "5m"), Some(150.0));
    }

    #[test]
    fn malformed_values_warn_and_are_omitted() {
        let raw = table(
            r#"
"CpuUsageAvg.5m" = "lots"
"CpuUsageAvg.10m" = true
"MemUsageAvg.5m" = -0.1
"MemUsageAvg.10m" = nan
"MemUsageAvg.15m" = 0.5
"#,
        );
        let (config, warnings) = parse_thresholds(Some(&raw));

        assert_eq!(config.len(), 1);
        assert_eq!(config.ceiling(MetricKind::Mem, "15m"), Some(0.5));
        assert_eq!(warnings.len(), 4);

        let invalid = warnings
            .iter()
            .filter(|w| matches!(w, ParseWarning::InvalidValue { .. }))
            .count();
        let out_of_range = warnings
            .iter()
            .filter(|w| matches!(w, ParseWarning::OutOfRange { .. }))
            .count();
        assert_eq!(invalid, 2);
        assert_eq!(out_of_range, 2);
    }

    #[test]
    fn empty_window_warns() {
        let raw = table(r#""CpuUsageAvg." = 0.5"#);
        let (config, warnings) = parse_thresholds(Some(&raw));
        assert!(config.is_empty());
        assert_eq!(warnings, vec![ParseWarning::EmptyWindow { key: "CpuUsageAvg.".to_string() }]);
    }

    #[test]
    fn duplicate_window_last_write_wins() {
        let first = toml::Value::Float(0.5);
        let second = toml::Value::Float(0.7);
        let (config, warnings) =
            ThresholdConfig::from_entries([("CpuUsageAvg.5m", &first), ("CpuUsageAvg. 5m ", &second)]);

        assert_eq!(config.ceiling(MetricKind::Cpu, "5m"), Some(0.7));
        assert_eq!(
            warnings,
            vec![ParseWarning::DuplicateWindow {
                metric: MetricKind::Cpu,
                window: "5m".to_string(),
                key: "CpuUsageAvg. 5m ".to_string(),
            }]
        );
    }
}
