//! Status command: applied and pending migrations

use std::collections::HashSet;

use serde::Serialize;
use strata_engine::{LedgerRow, Migrator};

use crate::output::OutputFormat;

#[derive(Serialize)]
struct StatusReport {
    applied: Vec<LedgerRow>,
    pending: Vec<String>,
}

pub fn run(migrator: &mut Migrator<'_>, format: OutputFormat) -> anyhow::Result<()> {
    tracing::debug!("Running status command");

    let applied = migrator.applied()?;
    let unit_names = migrator.unit_names()?;

    let applied_names: HashSet<&str> = applied.iter().map(|row| row.name.as_str()).collect();
    let pending: Vec<String> = unit_names
        .into_iter()
        .filter(|name| !applied_names.contains(name.as_str()))
        .collect();

    let report = StatusReport { applied, pending };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            if report.applied.is_empty() {
                println!("No migrations applied");
            } else {
                println!("Applied ({}):", report.applied.len());
                for row in &report.applied {
                    println!(
                        "  {}  {}",
                        row.name,
                        row.applied_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }

            if report.pending.is_empty() {
                println!("Pending: none");
            } else {
                println!("Pending ({}):", report.pending.len());
                for name in &report.pending {
                    println!("  {name}");
                }
            }
        }
    }

    Ok(())
}
