//! Version synchronization across the main and platform manifests.
//!
//! A run reads and parses every manifest before writing any of them. Writes
//! then go platform manifests first and the main manifest last: until the
//! main manifest is rewritten, an interrupted run shows up in validation as
//! platform versions that disagree with the main version.

use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::error::VersionError;
use crate::layout::DistLayout;
use crate::manifest::Manifest;
use crate::platform::TargetKey;
use crate::runtime::Runtime;

/// Check that `version` is a plain semantic version such as `1.2.3` or
/// `1.2.3-beta.1`.
pub fn parse_version(version: &str) -> Result<semver::Version, VersionError> {
    let trimmed = version.trim();
    if let Some(rest) = trimmed.strip_prefix(['v', 'V'])
        && semver::Version::parse(rest).is_ok()
    {
        return Err(VersionError::LeadingV {
            given: trimmed.to_string(),
            suggestion: rest.to_string(),
        });
    }
    semver::Version::parse(trimmed).map_err(|e| VersionError::Invalid {
        given: version.to_string(),
        reason: e.to_string(),
    })
}

/// One manifest's planned version change.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionChange {
    pub package: String,
    pub path: PathBuf,
    pub from: Option<String>,
    pub to: String,
}

impl VersionChange {
    pub fn is_noop(&self) -> bool {
        self.from.as_deref() == Some(self.to.as_str())
    }
}

struct Loaded {
    path: PathBuf,
    manifest: Manifest,
    change: VersionChange,
}

pub struct VersionSynchronizer<'a, R: Runtime> {
    runtime: &'a R,
    layout: &'a DistLayout,
}

impl<'a, R: Runtime> VersionSynchronizer<'a, R> {
    pub fn new(runtime: &'a R, layout: &'a DistLayout) -> Self {
        Self { runtime, layout }
    }

    /// Report what [`VersionSynchronizer::apply`] would change, writing nothing.
    #[tracing::instrument(skip(self))]
    pub fn plan(&self, version: &str) -> Result<Vec<VersionChange>> {
        let version = parse_version(version)?.to_string();
        let (platforms, main) = self.load_all(&version)?;
        Ok(platforms
            .into_iter()
            .chain(std::iter::once(main))
            .map(|loaded| loaded.change)
            .collect())
    }

    /// Stamp `version` on every platform manifest, every platform pin in the
    /// main manifest's `optionalDependencies` and the main manifest itself.
    #[tracing::instrument(skip(self))]
    pub fn apply(&self, version: &str) -> Result<Vec<VersionChange>> {
        let version = parse_version(version)?.to_string();
        let (platforms, mut main) = self.load_all(&version)?;

        let mut changes = Vec::with_capacity(platforms.len() + 1);
        for mut loaded in platforms {
            loaded.manifest.set_version(&version);
            main.manifest
                .set_optional_dependency(&loaded.change.package, &version);
            loaded.manifest.save(self.runtime, &loaded.path)?;
            debug!("Stamped {} on {:?}", version, loaded.path);
            changes.push(loaded.change);
        }

        main.manifest.set_version(&version);
        main.manifest.save(self.runtime, &main.path)?;
        debug!("Stamped {} on {:?}", version, main.path);
        changes.push(main.change);

        Ok(changes)
    }

    fn load_all(&self, version: &str) -> Result<(Vec<Loaded>, Loaded)> {
        let main = self.load(self.layout.main_manifest(), self.layout.package_name(), version)?;

        let platforms = TargetKey::ALL
            .into_iter()
            .map(|key| {
                self.load(
                    self.layout.platform_manifest(key),
                    &self.layout.platform_package_name(key),
                    version,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((platforms, main))
    }

    fn load(&self, path: PathBuf, expected_name: &str, version: &str) -> Result<Loaded> {
        let manifest = Manifest::load(self.runtime, &path)
            .with_context(|| format!("Cannot synchronize {}", expected_name))?;
        let change = VersionChange {
            // Pins are keyed by the name the package is published under
            package: manifest.name().unwrap_or(expected_name).to_string(),
            path: path.clone(),
            from: manifest.version().map(str::to_string),
            to: version.to_string(),
        };
        Ok(Loaded {
            path,
            manifest,
            change,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn fixture() -> (TempDir, DistLayout) {
        let dir = tempdir().unwrap();
        let layout = DistLayout::new(dir.path(), "@acme/tool", "tool");

        fs::write(
            layout.main_manifest(),
            r#"{
  "name": "@acme/tool",
  "version": "0.1.0",
  "optionalDependencies": {
    "@acme/tool-win32-x64": "0.1.0",
    "@acme/tool-linux-x64": "0.0.9"
  },
  "license": "MIT"
}
"#,
        )
        .unwrap();

        for key in TargetKey::ALL {
            fs::create_dir_all(layout.platform_dir(key)).unwrap();
            fs::write(
                layout.platform_manifest(key),
                format!(
                    "{{\n  \"name\": \"{}\",\n  \"version\": \"0.1.0\",\n  \"os\": [\"{}\"]\n}}\n",
                    layout.platform_package_name(key),
                    key.os.as_str()
                ),
            )
            .unwrap();
        }

        (dir, layout)
    }

    fn snapshot(layout: &DistLayout) -> Vec<String> {
        std::iter::once(layout.main_manifest())
            .chain(TargetKey::ALL.iter().map(|k| layout.platform_manifest(*k)))
            .map(|p| fs::read_to_string(p).unwrap())
            .collect()
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("1.2.3").unwrap().to_string(), "1.2.3");
        assert_eq!(parse_version(" 0.2.0-beta.1 ").unwrap().to_string(), "0.2.0-beta.1");
        assert_eq!(
            parse_version("v1.2.3"),
            Err(VersionError::LeadingV {
                given: "v1.2.3".into(),
                suggestion: "1.2.3".into()
            })
        );
        assert!(matches!(parse_version("1.2"), Err(VersionError::Invalid { .. })));
        assert!(matches!(parse_version(""), Err(VersionError::Invalid { .. })));
        assert!(matches!(parse_version("latest"), Err(VersionError::Invalid { .. })));
    }

    #[test]
    fn test_apply_makes_all_versions_agree() {
        let (_dir, layout) = fixture();
        let runtime = RealRuntime;

        let changes = VersionSynchronizer::new(&runtime, &layout)
            .apply("1.4.0")
            .unwrap();
        assert_eq!(changes.len(), 7);
        assert_eq!(changes.last().unwrap().package, "@acme/tool");

        let main = Manifest::load(&runtime, &layout.main_manifest()).unwrap();
        assert_eq!(main.version(), Some("1.4.0"));
        for key in TargetKey::ALL {
            let platform = Manifest::load(&runtime, &layout.platform_manifest(key)).unwrap();
            let name = platform.name().unwrap();
            assert_eq!(platform.version(), Some("1.4.0"));
            assert_eq!(main.optional_dependency(name), platform.version());
        }
        assert_eq!(main.license(), Some("MIT"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let (_dir, layout) = fixture();
        let runtime = RealRuntime;
        let sync = VersionSynchronizer::new(&runtime, &layout);

        sync.apply("2.0.0").unwrap();
        let first = snapshot(&layout);
        let changes = sync.apply("2.0.0").unwrap();
        assert_eq!(snapshot(&layout), first);
        assert!(changes.iter().all(VersionChange::is_noop));
    }

    #[test]
    fn test_formatting_is_stable() {
        let (_dir, layout) = fixture();
        VersionSynchronizer::new(&RealRuntime, &layout)
            .apply("0.3.0")
            .unwrap();

        let content = fs::read_to_string(layout.main_manifest()).unwrap();
        assert!(content.starts_with("{\n  \"name\": \"@acme/tool\",\n  \"version\": \"0.3.0\","));
        assert!(content.ends_with("}\n"));
        // Key order survives: license stays last
        assert!(content.trim_end().ends_with("\"license\": \"MIT\"\n}"));
    }

    #[test]
    fn test_plan_writes_nothing() {
        let (_dir, layout) = fixture();
        let before = snapshot(&layout);

        let changes = VersionSynchronizer::new(&RealRuntime, &layout)
            .plan("0.5.0")
            .unwrap();

        assert_eq!(snapshot(&layout), before);
        assert_eq!(changes.len(), 7);
        assert!(changes.iter().all(|c| c.from.as_deref() == Some("0.1.0")));
        assert!(changes.iter().all(|c| c.to == "0.5.0"));
    }

    #[test_log::test]
    fn test_missing_platform_manifest_writes_nothing() {
        let (_dir, layout) = fixture();
        let darwin = TargetKey::ALL[5];
        fs::remove_file(layout.platform_manifest(darwin)).unwrap();
        let before = snapshot_without(&layout, darwin);

        let err = VersionSynchronizer::new(&RealRuntime, &layout)
            .apply("9.9.9")
            .unwrap_err();

        assert!(format!("{:#}", err).contains("@acme/tool-darwin-arm64"));
        assert_eq!(snapshot_without(&layout, darwin), before);
    }

    #[test]
    fn test_invalid_version_writes_nothing() {
        let (_dir, layout) = fixture();
        let before = snapshot(&layout);

        let err = VersionSynchronizer::new(&RealRuntime, &layout)
            .apply("v1.0.0")
            .unwrap_err();

        assert!(err.to_string().contains("not start with"));
        assert_eq!(snapshot(&layout), before);
    }

    fn snapshot_without(layout: &DistLayout, skip: TargetKey) -> Vec<String> {
        std::iter::once(layout.main_manifest())
            .chain(
                TargetKey::ALL
                    .iter()
                    .filter(|k| **k != skip)
                    .map(|k| layout.platform_manifest(*k)),
            )
            .map(|p| fs::read_to_string(p).unwrap())
            .collect()
    }
}
