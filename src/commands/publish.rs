use anyhow::{Context, Result};

use crate::publish::{NpmPublisher, Orchestrator, Publisher};
use crate::runtime::Runtime;

use super::config::{Config, Options};

/// Version, validate and publish every package with npm.
#[tracing::instrument(skip(runtime, options))]
pub fn publish<R: Runtime>(
    runtime: R,
    options: Options,
    version: &str,
    yes: bool,
    dry_run: bool,
) -> Result<()> {
    let config = Config::new(runtime, options)?;
    let publisher = NpmPublisher::new(&config.runtime, dry_run);
    run(&config, &publisher, version, yes, dry_run)
}

pub(crate) fn run<R: Runtime, P: Publisher>(
    config: &Config<R>,
    publisher: &P,
    version: &str,
    yes: bool,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        println!("     dry run (npm publish --dry-run)");
    } else {
        let user = publisher
            .whoami()
            .context("Not logged in to the npm registry; run npm login first")?;
        println!("   logged in as {}", user);
    }

    let outcome = Orchestrator::new(&config.runtime, &config.layout, publisher)
        .assume_yes(yes)
        .run(version)?;

    println!();
    println!(
        "{} package(s) published at version {}, {} skipped",
        outcome.published.len(),
        outcome.version,
        outcome.skipped.len()
    );
    Ok(())
}
