//! Publishing the platform packages and the main package.
//!
//! The [`Orchestrator`] owns the sequence: version stamping, validation,
//! every platform package in table order and finally the main package. The
//! registry itself sits behind the [`Publisher`] trait.

use anyhow::{Result, bail};
use log::{debug, info, warn};
use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::error::PublishError;
use crate::layout::DistLayout;
use crate::platform::TargetKey;
use crate::runtime::Runtime;
use crate::validate::Validator;
use crate::version::{VersionSynchronizer, parse_version};

#[cfg(windows)]
pub const NPM_PROGRAM: &str = "npm.cmd";
#[cfg(not(windows))]
pub const NPM_PROGRAM: &str = "npm";

/// Registry publishing.
#[cfg_attr(test, mockall::automock)]
pub trait Publisher {
    /// Publish the package in `package_dir`. Not retried.
    fn publish(&self, package_dir: &Path) -> Result<()>;

    /// Identity the registry client is logged in as.
    fn whoami(&self) -> Result<String>;
}

/// [`Publisher`] backed by the `npm` command line client.
pub struct NpmPublisher<'a, R: Runtime> {
    runtime: &'a R,
    dry_run: bool,
}

impl<'a, R: Runtime> NpmPublisher<'a, R> {
    pub fn new(runtime: &'a R, dry_run: bool) -> Self {
        Self { runtime, dry_run }
    }

    fn publish_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["publish".into(), "--access".into(), "public".into()];
        if self.dry_run {
            args.push("--dry-run".into());
        }
        args
    }
}

impl<R: Runtime> Publisher for NpmPublisher<'_, R> {
    #[tracing::instrument(skip(self))]
    fn publish(&self, package_dir: &Path) -> Result<()> {
        let status = self
            .runtime
            .run_inherited_in(OsStr::new(NPM_PROGRAM), &self.publish_args(), package_dir);
        match status {
            Ok(Some(0)) => Ok(()),
            Ok(Some(code)) => bail!("npm publish exited with code {}", code),
            Ok(None) => bail!("npm publish was terminated by a signal"),
            Err(e) => bail!("could not run {}: {}", NPM_PROGRAM, e),
        }
    }

    fn whoami(&self) -> Result<String> {
        let user = self
            .runtime
            .capture_stdout(OsStr::new(NPM_PROGRAM), &["whoami".into()])?;
        if user.is_empty() {
            bail!("npm whoami returned no user");
        }
        Ok(user)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Idle,
    Versioning,
    Validating,
    PublishingPlatforms,
    PublishingMain,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub version: String,
    /// Package identifiers in publish order, main package last
    pub published: Vec<String>,
    pub skipped: Vec<String>,
}

pub struct Orchestrator<'a, R: Runtime, P: Publisher> {
    runtime: &'a R,
    layout: &'a DistLayout,
    publisher: &'a P,
    assume_yes: bool,
    state: PublishState,
}

impl<'a, R: Runtime, P: Publisher> Orchestrator<'a, R, P> {
    pub fn new(runtime: &'a R, layout: &'a DistLayout, publisher: &'a P) -> Self {
        Self {
            runtime,
            layout,
            publisher,
            assume_yes: false,
            state: PublishState::Idle,
        }
    }

    /// Skip the confirmation prompt.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn state(&self) -> PublishState {
        self.state
    }

    fn transition(&mut self, state: PublishState) {
        debug!("Publish state {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn fail(&mut self, error: PublishError) -> PublishError {
        self.transition(PublishState::Failed);
        error
    }

    #[tracing::instrument(skip(self))]
    pub fn run(&mut self, version: &str) -> Result<PublishOutcome, PublishError> {
        let layout = self.layout;
        let version = match parse_version(version) {
            Ok(version) => version.to_string(),
            Err(e) => return Err(self.fail(PublishError::Version(e.into()))),
        };

        if !self.assume_yes && !self.confirm(&version) {
            return Err(PublishError::Cancelled);
        }

        self.transition(PublishState::Versioning);
        if let Err(e) = VersionSynchronizer::new(self.runtime, layout).apply(&version) {
            return Err(self.fail(PublishError::Version(e)));
        }
        println!("     version {}", version);

        self.transition(PublishState::Validating);
        let report = Validator::new(self.runtime, layout).validate();
        for finding in report.errors() {
            println!("       error {}", finding);
        }
        if !report.is_ok() {
            let errors = report.error_count();
            return Err(self.fail(PublishError::Validation { errors }));
        }

        self.transition(PublishState::PublishingPlatforms);
        let mut outcome = PublishOutcome {
            version: version.clone(),
            published: Vec::new(),
            skipped: Vec::new(),
        };

        for key in TargetKey::ALL {
            let package = layout.platform_package_name(key);
            if !self.has_binary(key) {
                println!("     skipped {} (no binary)", package);
                info!("Skipping {}: binary directory absent or empty", package);
                outcome.skipped.push(package);
                continue;
            }
            self.publish_one(&package, &version, &layout.platform_dir(key))?;
            outcome.published.push(package);
        }

        self.transition(PublishState::PublishingMain);
        let main = layout.package_name().to_string();
        self.publish_one(&main, &version, layout.package_dir())?;
        outcome.published.push(main);

        self.transition(PublishState::Done);
        Ok(outcome)
    }

    /// An unreadable answer counts as a refusal.
    fn confirm(&self, version: &str) -> bool {
        println!(
            "Publishing {} and its {} platform packages at version {}",
            self.layout.package_name(),
            TargetKey::ALL.len(),
            version
        );
        self.runtime.confirm("Continue?").unwrap_or_else(|e| {
            warn!("Cannot read the answer: {:#}", e);
            false
        })
    }

    fn has_binary(&self, key: TargetKey) -> bool {
        let bin_dir = self.layout.platform_bin_dir(key);
        self.runtime.is_dir(&bin_dir)
            && self
                .runtime
                .read_dir(&bin_dir)
                .map(|entries| !entries.is_empty())
                .unwrap_or(false)
    }

    fn publish_one(&mut self, package: &str, version: &str, dir: &Path) -> Result<(), PublishError> {
        println!("  publishing {}@{}", package, version);
        self.publisher.publish(dir).map_err(|e| {
            self.fail(PublishError::PublishFailure {
                package: package.to_string(),
                reason: format!("{:#}", e),
            })
        })
    }
}
