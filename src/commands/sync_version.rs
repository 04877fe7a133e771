use anyhow::Result;

use crate::runtime::Runtime;
use crate::version::{VersionChange, VersionSynchronizer};

use super::config::{Config, Options};

/// Stamp `version` on every manifest, or only report the changes when `check` is set.
#[tracing::instrument(skip(runtime, options))]
pub fn sync_version<R: Runtime>(
    runtime: R,
    options: Options,
    version: &str,
    check: bool,
) -> Result<()> {
    let config = Config::new(runtime, options)?;
    let synchronizer = VersionSynchronizer::new(&config.runtime, &config.layout);

    let changes = if check {
        synchronizer.plan(version)?
    } else {
        synchronizer.apply(version)?
    };

    for change in &changes {
        println!("{}", describe(change, check));
    }

    let pending = changes.iter().filter(|c| !c.is_noop()).count();
    println!();
    if check {
        println!("{} of {} manifests would change", pending, changes.len());
    } else {
        println!("{} of {} manifests updated", pending, changes.len());
    }
    Ok(())
}

fn describe(change: &VersionChange, check: bool) -> String {
    let from = change.from.as_deref().unwrap_or("(none)");
    if change.is_noop() {
        format!("   unchanged {} {}", change.package, change.to)
    } else if check {
        format!("  would set {} {} -> {}", change.package, from, change.to)
    } else {
        format!("     updated {} {} -> {}", change.package, from, change.to)
    }
}
