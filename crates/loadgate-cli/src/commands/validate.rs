use std::path::Path;

use super::open_session;

pub fn validate(config: &str) -> anyhow::Result<()> {
    let (ssn, report) = open_session(Path::new(config))?;

    let mut total = 0;
    for entry in &report {
        if entry.warnings.is_empty() {
            println!("✓ {}", entry.plugin);
            continue;
        }
        println!("⚠️ {} ({} warnings)", entry.plugin, entry.warnings.len());
        for w in &entry.warnings {
            println!("  - {w}");
        }
        total += entry.warnings.len();
    }

    if report.is_empty() {
        println!("no plugins configured");
    } else if total == 0 {
        println!("configuration OK");
    }

    ssn.close();
    Ok(())
}
