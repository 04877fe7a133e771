//! On-disk layout of the distribution packages.
//!
//! ```text
//! <package_dir>/
//!   package.json
//!   README.md
//!   bin/<binary>                      launcher entry point
//!   platform-packages/<slug>/
//!     package.json
//!     README.md
//!     bin/<binary>[.exe]
//! ```

use std::path::{Path, PathBuf};

use crate::manifest::MANIFEST_FILE;
use crate::platform::{BuildTarget, TargetKey};

pub const PLATFORM_PACKAGES_DIR: &str = "platform-packages";
pub const README_FILE: &str = "README.md";
pub const BIN_DIR: &str = "bin";

/// Paths and package identifiers of one main package and its platform packages.
#[derive(Debug, Clone, PartialEq)]
pub struct DistLayout {
    package_dir: PathBuf,
    package_name: String,
    binary_name: String,
}

impl DistLayout {
    pub fn new(
        package_dir: impl Into<PathBuf>,
        package_name: impl Into<String>,
        binary_name: impl Into<String>,
    ) -> Self {
        Self {
            package_dir: package_dir.into(),
            package_name: package_name.into(),
            binary_name: binary_name.into(),
        }
    }

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    pub fn main_manifest(&self) -> PathBuf {
        self.package_dir.join(MANIFEST_FILE)
    }

    pub fn main_readme(&self) -> PathBuf {
        self.package_dir.join(README_FILE)
    }

    /// The launcher the main package exposes as its command.
    pub fn main_entry_point(&self) -> PathBuf {
        self.package_dir.join(BIN_DIR).join(&self.binary_name)
    }

    /// Registry identifier of the platform package, e.g. `@acme/tool-linux-x64`.
    pub fn platform_package_name(&self, key: TargetKey) -> String {
        platform_package_name(&self.package_name, key)
    }

    /// Returns: `<package_dir>/platform-packages/<slug>`
    pub fn platform_dir(&self, key: TargetKey) -> PathBuf {
        self.package_dir.join(PLATFORM_PACKAGES_DIR).join(key.slug())
    }

    pub fn platform_manifest(&self, key: TargetKey) -> PathBuf {
        self.platform_dir(key).join(MANIFEST_FILE)
    }

    pub fn platform_readme(&self, key: TargetKey) -> PathBuf {
        self.platform_dir(key).join(README_FILE)
    }

    pub fn platform_bin_dir(&self, key: TargetKey) -> PathBuf {
        self.platform_dir(key).join(BIN_DIR)
    }

    /// Returns: `<package_dir>/platform-packages/<slug>/bin/<binary>[.exe]`
    pub fn platform_binary(&self, key: TargetKey) -> PathBuf {
        self.platform_bin_dir(key)
            .join(key.binary_file_name(&self.binary_name))
    }

    /// Compiled release binary of `target` under a cargo target directory.
    ///
    /// Returns: `<target_dir>/<triple>/release/<binary>[.exe]`
    pub fn build_output(&self, target_dir: &Path, target: &BuildTarget) -> PathBuf {
        target_dir
            .join(target.triple)
            .join("release")
            .join(target.key.binary_file_name(&self.binary_name))
    }
}

/// `<main>-<slug>`, shared by the release pipeline and the launcher.
pub fn platform_package_name(main_package: &str, key: TargetKey) -> String {
    format!("{}-{}", main_package, key.slug())
}
