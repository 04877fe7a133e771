//! Child process operations.

use anyhow::{Context, Result, bail};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn run_inherited_impl(
        &self,
        program: &OsStr,
        args: &[OsString],
        dir: Option<&Path>,
    ) -> io::Result<Option<i32>> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = dir {
            command.current_dir(dir);
        }
        let status = command.status()?;
        Ok(status.code())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn capture_stdout_impl(&self, program: &OsStr, args: &[OsString]) -> Result<String> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {}", program.to_string_lossy()))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                program.to_string_lossy(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
