//! Runtime abstraction for system operations.
//!
//! Every side effect the launcher and the release pipeline perform goes
//! through the [`Runtime`] trait, so the components can be exercised
//! against a mock or a temporary directory.
//!
//! # Structure
//!
//! - `env` - Environment variables, host platform, current executable
//! - `fs` - File system operations (read, write, copy, directory, permissions)
//! - `process` - Child processes (inherited streams, captured output)
//! - `user` - User interaction (confirmation prompts)

mod env;
mod fs;
mod process;
mod user;

use anyhow::Result;
use std::env as std_env;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    /// Host OS and CPU architecture as reported by the standard library
    /// (`std::env::consts::OS`, `std::env::consts::ARCH`).
    fn host_platform(&self) -> (&'static str, &'static str);

    fn current_exe(&self) -> Result<PathBuf>;

    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> Result<u64>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn is_dir(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;

    /// Absolute path with every symlink resolved.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;
    fn file_size(&self, path: &Path) -> Result<u64>;
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Set file permissions (mode) on Unix systems. No-op elsewhere.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;

    // Processes
    /// Run `program` directly (no shell) with the parent's standard streams
    /// and wait for it. Returns the exit code, or `None` when the child was
    /// terminated without one (e.g. by a signal).
    fn run_inherited(&self, program: &OsStr, args: &[OsString]) -> io::Result<Option<i32>>;

    /// Same as [`Runtime::run_inherited`] with `dir` as the working directory.
    fn run_inherited_in(
        &self,
        program: &OsStr,
        args: &[OsString],
        dir: &Path,
    ) -> io::Result<Option<i32>>;

    /// Run `program` with captured stdout, failing on a non-zero exit.
    fn capture_stdout(&self, program: &OsStr, args: &[OsString]) -> Result<String>;

    // User interaction
    /// Prompt user for confirmation. Returns true if user confirms (y/yes), false otherwise.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn host_platform(&self) -> (&'static str, &'static str) {
        self.host_platform_impl()
    }

    fn current_exe(&self) -> Result<PathBuf> {
        self.current_exe_impl()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.rename_impl(from, to)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<u64> {
        self.copy_impl(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.is_file_impl(path)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        self.canonicalize_impl(path)
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        self.file_size_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        self.set_permissions_impl(path, mode)
    }

    fn run_inherited(&self, program: &OsStr, args: &[OsString]) -> io::Result<Option<i32>> {
        self.run_inherited_impl(program, args, None)
    }

    fn run_inherited_in(
        &self,
        program: &OsStr,
        args: &[OsString],
        dir: &Path,
    ) -> io::Result<Option<i32>> {
        self.run_inherited_impl(program, args, Some(dir))
    }

    fn capture_stdout(&self, program: &OsStr, args: &[OsString]) -> Result<String> {
        self.capture_stdout_impl(program, args)
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.confirm_impl(prompt)
    }
}
