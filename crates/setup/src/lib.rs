//! Workspace provisioning.
//!
//! Creates the directory skeleton a workspace needs before skills can be
//! linked, and keeps the project `.gitignore` aware of the managed paths.

pub mod error;
pub mod gitignore;
pub mod scaffold;

pub use {
    error::{Error, Result},
    gitignore::{GitignoreOutcome, apply_gitignore},
    scaffold::{ScaffoldReport, scaffold_workspace},
};
