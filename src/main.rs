use anyhow::Result;
use binrelay::commands::{self, config::Options};
use clap::Parser;
use std::path::PathBuf;

/// binrelay - ship a native binary through npm
///
/// Prepares, versions, validates and publishes one main package plus one
/// package per platform, each carrying the binary for its OS and CPU.
///
/// Examples:
///   binrelay prepare                 # Copy target/<triple>/release binaries into the packages
///   binrelay sync-version 1.2.3      # Stamp 1.2.3 on every package.json
///   binrelay publish 1.2.3 --dry-run # Walk through a publish without uploading
#[derive(Parser, Debug)]
#[command(author, about, version = env!("BINRELAY_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of the main npm package (also via BINRELAY_PACKAGE_DIR)
    #[arg(
        long = "package-dir",
        short = 'p',
        env = "BINRELAY_PACKAGE_DIR",
        value_name = "PATH",
        global = true
    )]
    pub package_dir: Option<PathBuf>,

    /// Main package name (defaults to the name in its package.json)
    #[arg(
        long = "package-name",
        env = "BINRELAY_PACKAGE_NAME",
        value_name = "NAME",
        global = true
    )]
    pub package_name: Option<String>,

    /// Binary name without extension (defaults to the first `bin` command)
    #[arg(
        long = "binary-name",
        env = "BINRELAY_BINARY_NAME",
        value_name = "NAME",
        global = true
    )]
    pub binary_name: Option<String>,

    /// Cargo target directory holding the cross-compiled release builds
    #[arg(
        long = "target-dir",
        env = "CARGO_TARGET_DIR",
        value_name = "PATH",
        global = true
    )]
    pub target_dir: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            package_dir: self.package_dir.clone(),
            package_name: self.package_name.clone(),
            binary_name: self.binary_name.clone(),
            target_dir: self.target_dir.clone(),
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Copy compiled release binaries into the platform packages
    Prepare,

    /// Set one version on the main package, its pins and every platform package
    SyncVersion(SyncVersionArgs),

    /// Check the package tree before publishing
    Validate,

    /// Version, validate and publish the platform packages, then the main package
    Publish(PublishArgs),

    /// Report whether the platform package for this host is installed
    CheckInstall,

    /// Print the binary the launcher would run on this host
    Locate,
}

#[derive(clap::Args, Debug)]
pub struct SyncVersionArgs {
    /// Semantic version, e.g. 1.2.3
    #[arg(value_name = "VERSION")]
    pub version: String,

    /// Only show what would change
    #[arg(long)]
    pub check: bool,
}

#[derive(clap::Args, Debug)]
pub struct PublishArgs {
    /// Semantic version, e.g. 1.2.3
    #[arg(value_name = "VERSION")]
    pub version: String,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Run npm publish with --dry-run
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = binrelay::runtime::RealRuntime;
    let options = cli.options();

    match cli.command {
        Commands::Prepare => commands::prepare(runtime, options)?,
        Commands::SyncVersion(args) => {
            commands::sync_version(runtime, options, &args.version, args.check)?
        }
        Commands::Validate => commands::validate(runtime, options)?,
        Commands::Publish(args) => {
            commands::publish(runtime, options, &args.version, args.yes, args.dry_run)?
        }
        Commands::CheckInstall => commands::check_install(runtime, options)?,
        Commands::Locate => commands::locate(runtime, options)?,
    }
    Ok(())
}
