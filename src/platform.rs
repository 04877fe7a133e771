//! Supported platforms and their static mappings.
//!
//! The support table is closed: a host is supported only if its exact
//! (`std::env::consts::OS`, `std::env::consts::ARCH`) pair appears in
//! [`HOST_TABLE`]. Each [`TargetKey`] owns exactly one distribution package
//! and exactly one [`BuildTarget`].

use std::fmt;

use crate::error::LaunchError;

/// Operating system family, named the way the registry names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Win32,
    Linux,
    Darwin,
}

impl Os {
    pub fn as_str(self) -> &'static str {
        match self {
            Os::Win32 => "win32",
            Os::Linux => "linux",
            Os::Darwin => "darwin",
        }
    }

    /// Conventional executable suffix on this OS family.
    pub fn exe_suffix(self) -> &'static str {
        match self {
            Os::Win32 => ".exe",
            Os::Linux | Os::Darwin => "",
        }
    }

    pub fn is_windows(self) -> bool {
        self == Os::Win32
    }
}

/// CPU architecture, named the way the registry names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        }
    }
}

/// Canonical (OS, architecture) pair of a supported runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetKey {
    pub os: Os,
    pub arch: Arch,
}

impl TargetKey {
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Every supported key, in publish order.
    pub const ALL: [TargetKey; 6] = [
        TargetKey::new(Os::Win32, Arch::X64),
        TargetKey::new(Os::Win32, Arch::Arm64),
        TargetKey::new(Os::Linux, Arch::X64),
        TargetKey::new(Os::Linux, Arch::Arm64),
        TargetKey::new(Os::Darwin, Arch::X64),
        TargetKey::new(Os::Darwin, Arch::Arm64),
    ];

    /// Package directory and name suffix, e.g. `linux-x64`.
    pub fn slug(&self) -> String {
        format!("{}-{}", self.os.as_str(), self.arch.as_str())
    }

    /// File name of the binary for this key, e.g. `tool` or `tool.exe`.
    pub fn binary_file_name(&self, binary_name: &str) -> String {
        format!("{}{}", binary_name, self.os.exe_suffix())
    }

    /// Look up a host (OS, architecture) pair by exact match.
    pub fn from_host(os: &str, arch: &str) -> Result<Self, LaunchError> {
        HOST_TABLE
            .iter()
            .find(|(host_os, host_arch, _)| *host_os == os && *host_arch == arch)
            .map(|(_, _, key)| *key)
            .ok_or_else(|| LaunchError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            })
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}

/// Host pairs as reported by `std::env::consts`, mapped to their key.
pub const HOST_TABLE: [(&str, &str, TargetKey); 6] = [
    ("windows", "x86_64", TargetKey::new(Os::Win32, Arch::X64)),
    ("windows", "aarch64", TargetKey::new(Os::Win32, Arch::Arm64)),
    ("linux", "x86_64", TargetKey::new(Os::Linux, Arch::X64)),
    ("linux", "aarch64", TargetKey::new(Os::Linux, Arch::Arm64)),
    ("macos", "x86_64", TargetKey::new(Os::Darwin, Arch::X64)),
    ("macos", "aarch64", TargetKey::new(Os::Darwin, Arch::Arm64)),
];

/// A cross-compilation output feeding one distribution package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTarget {
    pub triple: &'static str,
    pub key: TargetKey,
}

pub const BUILD_TARGETS: [BuildTarget; 6] = [
    BuildTarget {
        triple: "x86_64-pc-windows-msvc",
        key: TargetKey::new(Os::Win32, Arch::X64),
    },
    BuildTarget {
        triple: "aarch64-pc-windows-msvc",
        key: TargetKey::new(Os::Win32, Arch::Arm64),
    },
    BuildTarget {
        triple: "x86_64-unknown-linux-gnu",
        key: TargetKey::new(Os::Linux, Arch::X64),
    },
    BuildTarget {
        triple: "aarch64-unknown-linux-gnu",
        key: TargetKey::new(Os::Linux, Arch::Arm64),
    },
    BuildTarget {
        triple: "x86_64-apple-darwin",
        key: TargetKey::new(Os::Darwin, Arch::X64),
    },
    BuildTarget {
        triple: "aarch64-apple-darwin",
        key: TargetKey::new(Os::Darwin, Arch::Arm64),
    },
];
