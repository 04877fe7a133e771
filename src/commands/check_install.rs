use anyhow::Result;
use log::warn;

use crate::install_check::check_install as check;
use crate::runtime::Runtime;

use super::config::{Config, Options};

/// Report whether the current host's platform package is installed.
///
/// Never fails: an install must not break because of this check.
#[tracing::instrument(skip(runtime, options))]
pub fn check_install<R: Runtime>(runtime: R, options: Options) -> Result<()> {
    let config = match Config::new(runtime, options) {
        Ok(config) => config,
        Err(e) => {
            warn!("Skipping the installation check: {:#}", e);
            println!("Warning: could not verify the installation: {:#}", e);
            return Ok(());
        }
    };

    let status = check(&config.runtime, &config.launch_context());
    for line in status.messages(config.layout.package_name()) {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use tempfile::tempdir;

    #[test]
    fn test_missing_manifest_does_not_fail() {
        let dir = tempdir().unwrap();
        check_install(
            RealRuntime,
            Options {
                package_dir: Some(dir.path().join("absent")),
                ..Default::default()
            },
        )
        .unwrap();
    }

    #[test]
    fn test_unsupported_platform_does_not_fail() {
        let mut runtime = MockRuntime::new();
        runtime.expect_host_platform().returning(|| ("solaris", "sparc64"));

        check_install(
            runtime,
            Options {
                package_dir: Some("/npm".into()),
                package_name: Some("tool".into()),
                binary_name: Some("tool".into()),
                target_dir: None,
            },
        )
        .unwrap();
    }
}
