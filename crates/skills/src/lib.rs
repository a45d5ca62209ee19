//! Skill discovery and linking.
//!
//! Packages under the workspace content root publish skills as
//! `<package>/skills/<name>/SKILL.md` files with YAML front matter. This
//! crate finds them, symlinks them into the assistant's skill directory,
//! and merges their activation triggers into the workspace rule file.

pub mod discover;
pub mod error;
pub mod link;
pub mod parse;
pub mod relpath;
pub mod types;

pub use {
    discover::{FsSkillDiscoverer, SkillDiscoverer},
    error::{Error, Result},
    link::{LinkOutcome, LinkReport, LinkStatus, RuleStatus, SkillLinker, UnlinkReport},
    types::{DiscoveredSkill, SkillMetadata},
};
