//! Typed failures of the launcher and the release pipeline.
//!
//! Plumbing errors (I/O, JSON) travel as `anyhow::Error`; the variants here
//! are the conditions a user has to act on, and each message names the
//! resource involved and what to do about it.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the launcher before or while handing over to the binary.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The host (OS, architecture) pair has no entry in the support table
    #[error("Unsupported platform: {os}-{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// The launcher could not work out which package it belongs to
    #[error("Cannot read package manifest {}: {reason}", path.display())]
    PackageManifest { path: PathBuf, reason: String },

    /// None of the candidate paths exists
    #[error(
        "Binary not found for {target}. Please make sure the package {package} is installed (npm install {package})."
    )]
    BinaryNotFound { target: String, package: String },

    /// The binary exists but could not be started
    #[error("Failed to execute binary {}: {source}", path.display())]
    SpawnFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rejected version strings.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VersionError {
    #[error("Version should not start with \"v\": use {suggestion}, not {given}")]
    LeadingV { given: String, suggestion: String },

    #[error("Invalid semantic version {given:?}: {reason}")]
    Invalid { given: String, reason: String },
}

/// Failures that end a publish run.
#[derive(Error, Debug)]
pub enum PublishError {
    /// The user declined the confirmation prompt; nothing was changed
    #[error("Publish cancelled")]
    Cancelled,

    /// Synchronizing versions failed; nothing has been published
    #[error("Version synchronization failed: {0:#}")]
    Version(anyhow::Error),

    /// The structural validation reported errors; nothing has been published
    #[error("Validation failed with {errors} error(s); fix them and run again")]
    Validation { errors: usize },

    /// The publish command failed for `package`; later packages were not attempted
    #[error(
        "Failed to publish {package}: {reason}. Packages published before it stay in the registry."
    )]
    PublishFailure { package: String, reason: String },
}
