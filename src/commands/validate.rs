use anyhow::Result;

use crate::error::PublishError;
use crate::runtime::Runtime;
use crate::validate::{ValidationReport, Validator};

use super::config::{Config, Options};

/// Check the package tree, failing when any error is found.
#[tracing::instrument(skip(runtime, options))]
pub fn validate<R: Runtime>(runtime: R, options: Options) -> Result<()> {
    let config = Config::new(runtime, options)?;
    let report = Validator::new(&config.runtime, &config.layout).validate();
    print_report(&report);

    if !report.is_ok() {
        return Err(PublishError::Validation {
            errors: report.error_count(),
        }
        .into());
    }
    Ok(())
}

fn print_report(report: &ValidationReport) {
    for checked in &report.checked {
        println!("          ok {}", checked);
    }
    for warning in report.warnings() {
        println!("     warning {}", warning);
    }
    for error in report.errors() {
        println!("       error {}", error);
    }

    println!();
    println!(
        "{} error(s), {} warning(s)",
        report.error_count(),
        report.warnings().count()
    );
}
