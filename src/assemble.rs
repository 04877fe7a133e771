//! Copies compiled binaries into their platform packages.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::layout::DistLayout;
use crate::platform::BuildTarget;
use crate::runtime::Runtime;

/// rwxr-xr-x
pub const EXECUTABLE_MODE: u32 = 0o755;

/// A binary copied into its package.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub slug: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes: u64,
}

/// A target whose compiled binary was not found.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub slug: String,
    pub source: PathBuf,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AssemblyReport {
    pub prepared: Vec<Prepared>,
    pub skipped: Vec<Skipped>,
}

impl AssemblyReport {
    pub fn success_count(&self) -> usize {
        self.prepared.len()
    }

    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }
}

pub struct Assembler<'a, R: Runtime> {
    runtime: &'a R,
    layout: &'a DistLayout,
    target_dir: PathBuf,
}

impl<'a, R: Runtime> Assembler<'a, R> {
    pub fn new(runtime: &'a R, layout: &'a DistLayout, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            layout,
            target_dir: target_dir.into(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Assemble every target in `targets`.
    ///
    /// A missing compiled binary is recorded as a skip and the remaining
    /// targets are still processed; only an I/O failure on a binary that
    /// does exist aborts the run.
    #[tracing::instrument(skip(self, targets))]
    pub fn assemble_all(&self, targets: &[BuildTarget]) -> Result<AssemblyReport> {
        let mut report = AssemblyReport::default();

        for target in targets {
            let slug = target.key.slug();
            let source = self.layout.build_output(&self.target_dir, target);

            if !self.runtime.is_file(&source) {
                warn!("Binary not found for {}: {}", target.triple, source.display());
                report.skipped.push(Skipped { slug, source });
                continue;
            }

            let prepared = self
                .assemble_one(target, &source)
                .with_context(|| format!("Failed to prepare {}", slug))?;
            report.prepared.push(prepared);
        }

        Ok(report)
    }

    fn assemble_one(&self, target: &BuildTarget, source: &Path) -> Result<Prepared> {
        let key = target.key;
        let bin_dir = self.layout.platform_bin_dir(key);
        let destination = self.layout.platform_binary(key);

        self.runtime.create_dir_all(&bin_dir)?;
        let bytes = self.runtime.copy(source, &destination)?;

        // The source mode is not trusted to survive the copy
        if !key.os.is_windows() {
            self.runtime.set_permissions(&destination, EXECUTABLE_MODE)?;
        }

        debug!("Copied {} bytes to {:?}", bytes, destination);
        Ok(Prepared {
            slug: key.slug(),
            source: source.to_path_buf(),
            destination,
            bytes,
        })
    }
}
