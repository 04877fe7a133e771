pub mod config;
mod check_install;
mod locate;
mod prepare;
mod publish;
mod sync_version;
mod validate;

pub use check_install::check_install;
pub use locate::locate;
pub use prepare::prepare;
pub use publish::publish;
pub use sync_version::sync_version;
pub use validate::validate;
