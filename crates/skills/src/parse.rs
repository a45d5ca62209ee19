//! SKILL.md front-matter parsing.

use anyhow::{Context, bail};

use crate::types::SkillMetadata;

/// Split a SKILL.md into its YAML front matter and markdown body.
///
/// The front matter sits between two `---` lines at the top of the file.
pub fn split_front_matter(content: &str) -> anyhow::Result<(String, String)> {
    let trimmed = content.trim_start();
    let Some(rest) = trimmed.strip_prefix("---") else {
        bail!("missing front matter delimiter");
    };
    let Some(end) = rest.find("\n---") else {
        bail!("unterminated front matter");
    };
    let front = rest[..end].trim().to_string();
    let after = &rest[end + 4..];
    let body = after.strip_prefix('\n').unwrap_or(after).to_string();
    Ok((front, body))
}

/// Parse activation metadata out of a SKILL.md.
///
/// An empty front matter block is valid and yields defaults; malformed YAML
/// or out-of-range enum values are errors the caller should report and skip.
pub fn parse_metadata(content: &str) -> anyhow::Result<SkillMetadata> {
    let (front, _body) = split_front_matter(content)?;
    if front.is_empty() {
        return Ok(SkillMetadata::default());
    }
    serde_yaml::from_str(&front).context("invalid SKILL.md front matter")
}
