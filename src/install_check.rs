//! Post-install check of the platform package for the current host.
//!
//! Package managers do not fail an install when an optional dependency is
//! skipped, so the main package runs this after installation to tell the
//! user early. It never fails.

use std::path::PathBuf;

use crate::error::LaunchError;
use crate::launcher::{self, LaunchContext};
use crate::layout::platform_package_name;
use crate::platform::TargetKey;
use crate::runtime::Runtime;

#[derive(Debug, Clone, PartialEq)]
pub enum InstallStatus {
    Installed { package: String, binary: PathBuf },
    Missing { package: String },
    Unsupported { os: String, arch: String },
    /// Something other than a missing package went wrong
    Unknown { reason: String },
}

impl InstallStatus {
    /// Lines to show the user.
    pub fn messages(&self, main_package: &str) -> Vec<String> {
        match self {
            InstallStatus::Installed { package, .. } => {
                vec![format!("{} installed successfully ({})", main_package, package)]
            }
            InstallStatus::Missing { package } => vec![
                format!("Warning: platform package {} is not installed.", package),
                "Optional dependencies may have been skipped by your package manager.".to_string(),
                format!("Try installing it manually: npm install {}", package),
            ],
            InstallStatus::Unsupported { os, arch } => vec![
                format!("Warning: {} does not ship a binary for {}-{}.", main_package, os, arch),
                format!(
                    "Supported platforms: {}",
                    TargetKey::ALL.map(|k| k.slug()).join(", ")
                ),
            ],
            InstallStatus::Unknown { reason } => {
                vec![format!("Warning: could not verify the installation: {}", reason)]
            }
        }
    }
}

#[tracing::instrument(skip(runtime))]
pub fn check_install<R: Runtime>(runtime: &R, context: &LaunchContext) -> InstallStatus {
    match launcher::resolve(runtime, context) {
        Ok(binary) => {
            let (os, arch) = runtime.host_platform();
            let package = TargetKey::from_host(os, arch)
                .map(|key| platform_package_name(&context.package_name, key))
                .unwrap_or_default();
            InstallStatus::Installed { package, binary }
        }
        Err(LaunchError::BinaryNotFound { package, .. }) => InstallStatus::Missing { package },
        Err(LaunchError::UnsupportedPlatform { os, arch }) => {
            InstallStatus::Unsupported { os, arch }
        }
        Err(e) => InstallStatus::Unknown {
            reason: e.to_string(),
        },
    }
}
