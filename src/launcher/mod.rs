//! Runtime launcher.
//!
//! Finds the platform package binary for the running host and hands the
//! process over to it. The launcher itself prints nothing unless it fails,
//! in which case it prints one `Error:` line and exits with
//! [`FAILURE_EXIT_CODE`].

mod delegate;
mod resolve;

pub use delegate::{ABNORMAL_EXIT_CODE, delegate};
pub use resolve::{candidate_paths, first_existing, install_roots};

use log::debug;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::LaunchError;
use crate::layout::platform_package_name;
use crate::manifest::{MANIFEST_FILE, Manifest};
use crate::platform::TargetKey;
use crate::runtime::Runtime;

pub const FAILURE_EXIT_CODE: i32 = 1;

// Kept apart from the release CLI's `BINRELAY_*` settings so that release
// work on a machine does not redirect installed launchers.
pub const PACKAGE_DIR_ENV: &str = "BINRELAY_SHIM_PACKAGE_DIR";
pub const PACKAGE_NAME_ENV: &str = "BINRELAY_SHIM_PACKAGE_NAME";
pub const BINARY_NAME_ENV: &str = "BINRELAY_SHIM_BINARY_NAME";

/// Where the launcher lives and what it launches.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchContext {
    /// Installed main package directory
    pub package_dir: PathBuf,
    /// Registry identifier of the main package
    pub package_name: String,
    /// Binary name without OS suffix
    pub binary_name: String,
}

impl LaunchContext {
    /// Resolve the context from the environment, falling back to the
    /// launcher's own location (`<package_dir>/bin/<binary>`) and the main
    /// package manifest.
    ///
    /// Package managers expose the launcher through a symlink in
    /// `node_modules/.bin`, so its location is taken after resolving links.
    pub fn from_env<R: Runtime>(runtime: &R) -> Result<Self, LaunchError> {
        let exe = own_location(runtime);

        let package_dir = match runtime.env_var(PACKAGE_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => exe
                .as_deref()
                .and_then(|exe| exe.parent())
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .ok_or_else(|| LaunchError::PackageManifest {
                    path: PathBuf::from(MANIFEST_FILE),
                    reason: format!("cannot locate the package directory; set {}", PACKAGE_DIR_ENV),
                })?,
        };

        let package_name = match runtime.env_var(PACKAGE_NAME_ENV) {
            Ok(name) => name,
            Err(_) => manifest_name(runtime, &package_dir)?,
        };

        let binary_name = match runtime.env_var(BINARY_NAME_ENV) {
            Ok(name) => name,
            Err(_) => exe
                .as_deref()
                .and_then(Path::file_stem)
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| package_name.rsplit('/').next().unwrap_or_default().to_string()),
        };

        Ok(Self {
            package_dir,
            package_name,
            binary_name,
        })
    }
}

fn own_location<R: Runtime>(runtime: &R) -> Option<PathBuf> {
    let exe = runtime.current_exe().ok()?;
    match runtime.canonicalize(&exe) {
        Ok(resolved) => {
            debug!("Launcher {:?} resolves to {:?}", exe, resolved);
            Some(resolved)
        }
        Err(e) => {
            debug!("Cannot resolve {:?}: {:#}", exe, e);
            Some(exe)
        }
    }
}

fn manifest_name<R: Runtime>(runtime: &R, package_dir: &Path) -> Result<String, LaunchError> {
    let path = package_dir.join(MANIFEST_FILE);
    let manifest = Manifest::load(runtime, &path).map_err(|e| LaunchError::PackageManifest {
        path: path.clone(),
        reason: format!("{:#}", e),
    })?;
    manifest
        .name()
        .map(str::to_string)
        .ok_or_else(|| LaunchError::PackageManifest {
            path,
            reason: "missing 'name' field".to_string(),
        })
}

/// Detect the host and find its binary.
pub fn resolve<R: Runtime>(runtime: &R, context: &LaunchContext) -> Result<PathBuf, LaunchError> {
    let (os, arch) = runtime.host_platform();
    let key = TargetKey::from_host(os, arch)?;
    let platform_package = platform_package_name(&context.package_name, key);
    debug!("Host {}-{} maps to {}", os, arch, platform_package);

    let roots = install_roots(&context.package_dir, &context.package_name);
    let candidates = candidate_paths(&roots, &platform_package, &context.binary_name, key);
    first_existing(runtime, &candidates, key, &platform_package)
}

/// Resolve and run the binary, returning the exit code to end the process with.
///
/// This is the single place a launcher exit code is decided; callers pass it
/// straight to `std::process::exit`.
pub fn run<R: Runtime>(runtime: &R, args: &[OsString]) -> i32 {
    let outcome = LaunchContext::from_env(runtime)
        .and_then(|context| resolve(runtime, &context))
        .and_then(|binary| delegate(runtime, &binary, args));

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            FAILURE_EXIT_CODE
        }
    }
}
