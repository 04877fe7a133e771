//! Structural validation of the distribution packages before publishing.
//!
//! Findings are collected for every package rather than stopping at the
//! first one; only [`Severity::Error`] findings block a publish.

use log::debug;
use std::fmt;
use std::path::Path;

use crate::layout::DistLayout;
use crate::manifest::Manifest;
use crate::platform::TargetKey;
use crate::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub severity: Severity,
    pub package: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.package, self.message)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    /// Human readable record of what was found in place
    pub checked: Vec<String>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    fn error(&mut self, package: &str, message: impl Into<String>) {
        self.push(Severity::Error, package, message.into());
    }

    fn warning(&mut self, package: &str, message: impl Into<String>) {
        self.push(Severity::Warning, package, message.into());
    }

    fn push(&mut self, severity: Severity, package: &str, message: String) {
        debug!("{:?} {}: {}", severity, package, message);
        self.findings.push(Finding {
            severity,
            package: package.to_string(),
            message,
        });
    }

    fn ok(&mut self, what: String) {
        self.checked.push(what);
    }
}

pub struct Validator<'a, R: Runtime> {
    runtime: &'a R,
    layout: &'a DistLayout,
}

impl<'a, R: Runtime> Validator<'a, R> {
    pub fn new(runtime: &'a R, layout: &'a DistLayout) -> Self {
        Self { runtime, layout }
    }

    #[tracing::instrument(skip(self))]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let main_name = self.layout.package_name();

        let main = self.check_manifest(&mut report, &self.layout.main_manifest(), main_name);
        self.check_optional_file(&mut report, main_name, &self.layout.main_readme(), "README");
        self.check_optional_file(
            &mut report,
            main_name,
            &self.layout.main_entry_point(),
            "CLI entry point",
        );
        let main_version = main.as_ref().and_then(|m| m.version().map(str::to_string));

        for key in TargetKey::ALL {
            self.check_platform(&mut report, key, main.as_ref(), main_version.as_deref());
        }

        report
    }

    fn check_platform(
        &self,
        report: &mut ValidationReport,
        key: TargetKey,
        main: Option<&Manifest>,
        main_version: Option<&str>,
    ) {
        let package = self.layout.platform_package_name(key);
        let dir = self.layout.platform_dir(key);
        if !self.runtime.is_dir(&dir) {
            report.error(&package, format!("Missing package directory ({})", dir.display()));
            return;
        }

        let manifest = self.check_manifest(report, &self.layout.platform_manifest(key), &package);
        self.check_optional_file(report, &package, &self.layout.platform_readme(key), "README");
        self.check_binary(report, &package, &self.layout.platform_binary(key));

        let Some(main_version) = main_version else {
            return;
        };
        if let Some(version) = manifest.as_ref().and_then(Manifest::version)
            && version != main_version
        {
            report.error(
                &package,
                format!(
                    "Version {} differs from main package version {}; run sync-version",
                    version, main_version
                ),
            );
        }

        let published_name = manifest
            .as_ref()
            .and_then(Manifest::name)
            .unwrap_or(&package)
            .to_string();
        match main.and_then(|m| m.optional_dependency(&published_name)) {
            None => report.warning(
                &package,
                format!("Not listed in optionalDependencies of {}", self.layout.package_name()),
            ),
            Some(pin) if pin != main_version => report.error(
                &package,
                format!(
                    "optionalDependencies pins {} but the main package version is {}; run sync-version",
                    pin, main_version
                ),
            ),
            Some(_) => {}
        }
    }

    /// Returns the manifest when it could be parsed, whatever its findings.
    fn check_manifest(
        &self,
        report: &mut ValidationReport,
        path: &Path,
        expected_name: &str,
    ) -> Option<Manifest> {
        if !self.runtime.is_file(path) {
            report.error(expected_name, format!("Missing package.json ({})", path.display()));
            return None;
        }

        let manifest = match Manifest::load(self.runtime, path) {
            Ok(manifest) => manifest,
            Err(e) => {
                report.error(expected_name, format!("Invalid package.json - {:#}", e));
                return None;
            }
        };

        match manifest.name() {
            None => report.error(expected_name, "Missing 'name' field"),
            Some(name) if name != expected_name => report.warning(
                expected_name,
                format!("Name mismatch (expected: {}, got: {})", expected_name, name),
            ),
            Some(_) => {}
        }
        if manifest.version().is_none() {
            report.error(expected_name, "Missing 'version' field");
        }
        if manifest.license().is_none() {
            report.warning(expected_name, "Missing 'license' field");
        }

        report.ok(format!("{} package.json", expected_name));
        Some(manifest)
    }

    fn check_optional_file(
        &self,
        report: &mut ValidationReport,
        package: &str,
        path: &Path,
        what: &str,
    ) {
        if self.runtime.is_file(path) {
            report.ok(format!("{} {}", package, what));
        } else {
            report.warning(package, format!("Missing {} ({})", what, path.display()));
        }
    }

    fn check_binary(&self, report: &mut ValidationReport, package: &str, path: &Path) {
        if !self.runtime.is_file(path) {
            report.warning(
                package,
                format!("Binary not found ({}) - will be added during build", path.display()),
            );
            return;
        }

        match self.runtime.file_size(path) {
            Ok(0) => report.error(package, "Binary is empty"),
            Ok(size) => report.ok(format!(
                "{} binary ({:.2} MB)",
                package,
                size as f64 / 1024.0 / 1024.0
            )),
            Err(e) => report.error(package, format!("Cannot read binary - {:#}", e)),
        }
    }
}
