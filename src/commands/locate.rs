use anyhow::Result;

use crate::launcher;
use crate::runtime::Runtime;

use super::config::{Config, Options};

/// Print the binary the launcher would run on this host.
#[tracing::instrument(skip(runtime, options))]
pub fn locate<R: Runtime>(runtime: R, options: Options) -> Result<()> {
    let config = Config::new(runtime, options)?;
    let binary = launcher::resolve(&config.runtime, &config.launch_context())?;
    println!("{}", binary.display());
    Ok(())
}
