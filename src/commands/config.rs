use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::launcher::LaunchContext;
use crate::layout::DistLayout;
use crate::manifest::Manifest;
use crate::runtime::Runtime;

pub const DEFAULT_PACKAGE_DIR: &str = "package/npm";
pub const DEFAULT_TARGET_DIR: &str = "target";

/// Settings given on the command line (or through their environment variables).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub package_dir: Option<PathBuf>,
    pub package_name: Option<String>,
    pub binary_name: Option<String>,
    pub target_dir: Option<PathBuf>,
}

pub struct Config<R: Runtime> {
    pub runtime: R,
    pub layout: DistLayout,
    pub target_dir: PathBuf,
}

impl<R: Runtime> Config<R> {
    /// Fill in whatever `options` leaves open from the main manifest.
    pub fn new(runtime: R, options: Options) -> Result<Self> {
        let package_dir = options
            .package_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PACKAGE_DIR));
        let target_dir = options
            .target_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR));

        let (package_name, binary_name) = match (options.package_name, options.binary_name) {
            (Some(name), Some(binary)) => (name, binary),
            (name, binary) => {
                let path = package_dir.join(crate::manifest::MANIFEST_FILE);
                let manifest = Manifest::load(&runtime, &path).with_context(|| {
                    format!(
                        "Cannot read the main package manifest in {}; use --package-dir or --package-name",
                        package_dir.display()
                    )
                })?;
                let name = match name {
                    Some(name) => name,
                    None => manifest
                        .name()
                        .map(str::to_string)
                        .with_context(|| format!("{} has no 'name' field", path.display()))?,
                };
                let binary = binary
                    .or_else(|| manifest.bin_command())
                    .unwrap_or_else(|| unscoped(&name).to_string());
                (name, binary)
            }
        };

        debug!(
            "Package {} (binary {}) in {:?}, build output in {:?}",
            package_name, binary_name, package_dir, target_dir
        );
        Ok(Self {
            runtime,
            layout: DistLayout::new(package_dir, package_name, binary_name),
            target_dir,
        })
    }

    /// The launcher's view of the same package.
    pub fn launch_context(&self) -> LaunchContext {
        LaunchContext {
            package_dir: self.layout.package_dir().to_path_buf(),
            package_name: self.layout.package_name().to_string(),
            binary_name: self.layout.binary_name().to_string(),
        }
    }
}

fn unscoped(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    #[test]
    fn test_defaults_come_from_manifest() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .with(eq(PathBuf::from("package/npm/package.json")))
            .returning(|_| {
                Ok(r#"{"name": "@acme/tool", "version": "1.0.0", "bin": {"acme": "bin/acme"}}"#
                    .into())
            });

        let config = Config::new(runtime, Options::default()).unwrap();
        assert_eq!(config.layout.package_dir(), PathBuf::from("package/npm"));
        assert_eq!(config.layout.package_name(), "@acme/tool");
        assert_eq!(config.layout.binary_name(), "acme");
        assert_eq!(config.target_dir, PathBuf::from("target"));
    }

    #[test]
    fn test_binary_defaults_to_unscoped_name() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(|_| Ok(r#"{"name": "@acme/tool"}"#.into()));

        let config = Config::new(runtime, Options::default()).unwrap();
        assert_eq!(config.layout.binary_name(), "tool");
    }

    #[test]
    fn test_explicit_options_skip_manifest() {
        let mut runtime = MockRuntime::new();
        runtime.expect_read_to_string().never();

        let config = Config::new(
            runtime,
            Options {
                package_dir: Some(PathBuf::from("/repo/npm")),
                package_name: Some("tool".into()),
                binary_name: Some("tool".into()),
                target_dir: Some(PathBuf::from("/repo/out")),
            },
        )
        .unwrap();

        let context = config.launch_context();
        assert_eq!(context.package_dir, PathBuf::from("/repo/npm"));
        assert_eq!(context.package_name, "tool");
        assert_eq!(config.target_dir, PathBuf::from("/repo/out"));
    }

    #[test]
    fn test_missing_manifest_is_explained() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(|_| Err(anyhow::anyhow!("No such file or directory")));

        let err = Config::new(runtime, Options::default()).err().unwrap();
        assert!(err.to_string().contains("--package-dir"));
    }
}
