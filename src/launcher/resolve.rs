//! Candidate path resolution.
//!
//! Two install topologies are supported, tried in this order:
//!
//! 1. registry install: the platform package is a sibling of the main
//!    package inside the same `node_modules` root;
//! 2. local development: the platform package is nested in the main
//!    package's own `node_modules`.

use log::debug;
use std::path::{Path, PathBuf};

use crate::error::LaunchError;
use crate::layout::BIN_DIR;
use crate::platform::TargetKey;
use crate::runtime::Runtime;

/// Base directories that may hold the platform package, highest priority first.
///
/// `package_dir` is the installed main package and `package_name` its
/// registry identifier; a scoped name (`@scope/name`) sits two directories
/// below the `node_modules` root, an unscoped one directly below it.
pub fn install_roots(package_dir: &Path, package_name: &str) -> Vec<PathBuf> {
    let mut roots = Vec::with_capacity(2);

    let depth = package_name.split('/').filter(|c| !c.is_empty()).count();
    if let Some(modules_root) = package_dir.ancestors().nth(depth) {
        roots.push(modules_root.to_path_buf());
    }
    roots.push(package_dir.join("node_modules"));

    roots
}

/// Every location the binary may be at, in priority order.
///
/// For each root the bare binary name is tried first, followed by the name
/// with the OS executable suffix when the key's OS has one.
pub fn candidate_paths(
    roots: &[PathBuf],
    platform_package: &str,
    binary_name: &str,
    key: TargetKey,
) -> Vec<PathBuf> {
    let mut file_names = vec![binary_name.to_string()];
    let suffixed = key.binary_file_name(binary_name);
    if suffixed != binary_name {
        file_names.push(suffixed);
    }

    let mut candidates = Vec::with_capacity(roots.len() * file_names.len());
    for root in roots {
        let bin_dir = platform_package
            .split('/')
            .fold(root.clone(), |dir, component| dir.join(component))
            .join(BIN_DIR);
        for file_name in &file_names {
            candidates.push(bin_dir.join(file_name));
        }
    }
    candidates
}

/// First existing candidate wins.
pub fn first_existing<R: Runtime>(
    runtime: &R,
    candidates: &[PathBuf],
    key: TargetKey,
    platform_package: &str,
) -> Result<PathBuf, LaunchError> {
    for candidate in candidates {
        if runtime.is_file(candidate) {
            debug!("Resolved binary {:?}", candidate);
            return Ok(candidate.clone());
        }
        debug!("No binary at {:?}", candidate);
    }

    Err(LaunchError::BinaryNotFound {
        target: key.to_string(),
        package: platform_package.to_string(),
    })
}
