//! Forward and backward migration commands

use std::cmp::Ordering;

use strata_core::Target;
use strata_engine::Migrator;

pub fn up(migrator: &mut Migrator<'_>) -> anyhow::Result<()> {
    tracing::debug!("Running up command");

    let before = migrator.applied()?.len();
    migrator.migrate_to_latest()?;
    let after = migrator.applied()?.len();

    if after > before {
        println!("Applied {} migration(s)", after - before);
    } else {
        println!("Nothing to apply; database is up to date");
    }
    Ok(())
}

pub fn reset(migrator: &mut Migrator<'_>) -> anyhow::Result<()> {
    tracing::debug!("Running reset command");

    let before = migrator.applied()?.len();
    migrator.migrate_to_nothing()?;

    if before > 0 {
        println!("Undid {before} migration(s)");
    } else {
        println!("Nothing to undo");
    }
    Ok(())
}

pub fn to(migrator: &mut Migrator<'_>, spec: &str) -> anyhow::Result<()> {
    tracing::debug!(target = spec, "Running to command");

    let before = migrator.applied()?.len();
    migrator.migrate(&Target::parse(spec))?;
    let after = migrator.applied()?.len();

    match after.cmp(&before) {
        Ordering::Greater => println!("Applied {} migration(s)", after - before),
        Ordering::Less => println!("Undid {} migration(s)", before - after),
        Ordering::Equal => println!("Already at {spec}"),
    }
    Ok(())
}
