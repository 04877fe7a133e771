//! Ship one native executable through an npm-style registry as a main
//! package plus one package per supported platform, and launch the right
//! binary at run time.
//!
//! The release side ([`assemble`], [`version`], [`validate`], [`publish`])
//! builds and publishes the packages; the run side ([`launcher`]) is what
//! the installed main package executes.

pub mod assemble;
pub mod commands;
pub mod error;
pub mod install_check;
pub mod launcher;
pub mod layout;
pub mod manifest;
pub mod platform;
pub mod publish;
pub mod runtime;
pub mod validate;
pub mod version;
