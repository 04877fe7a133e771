//! Launcher installed as the main package's command.
//!
//! Every argument is forwarded to the platform binary untouched, so this
//! program has no options of its own. Set `BINRELAY_LOG=debug` to see how
//! the binary was resolved.

use std::ffi::OsString;

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or("BINRELAY_LOG", "warn")
            .write_style("BINRELAY_LOG_STYLE"),
    )
    .init();

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    std::process::exit(binrelay::launcher::run(&binrelay::runtime::RealRuntime, &args));
}
