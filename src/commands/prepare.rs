use anyhow::Result;

use crate::assemble::Assembler;
use crate::platform::BUILD_TARGETS;
use crate::runtime::Runtime;

use super::config::{Config, Options};

/// Copy every compiled release binary into its platform package.
#[tracing::instrument(skip(runtime, options))]
pub fn prepare<R: Runtime>(runtime: R, options: Options) -> Result<()> {
    let config = Config::new(runtime, options)?;
    let assembler = Assembler::new(&config.runtime, &config.layout, &config.target_dir);

    println!(
        "   preparing {} from {}",
        config.layout.package_name(),
        assembler.target_dir().display()
    );
    let report = assembler.assemble_all(&BUILD_TARGETS)?;

    for prepared in &report.prepared {
        println!(
            "    prepared {} ({:.2} MB)",
            prepared.slug,
            prepared.bytes as f64 / 1024.0 / 1024.0
        );
    }
    for skipped in &report.skipped {
        println!("     skipped {} (not built: {})", skipped.slug, skipped.source.display());
    }

    println!();
    println!(
        "{} prepared, {} skipped",
        report.success_count(),
        report.skip_count()
    );
    Ok(())
}
