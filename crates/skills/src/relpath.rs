//! Relative path computation for symlink targets.

use std::path::{Path, PathBuf};

/// Compute the relative path from `base` (a directory) to `target`.
///
/// Purely lexical: no filesystem access, no symlink resolution. Both paths
/// should be absolute, or at least rooted the same way; equal inputs yield
/// an empty path. Links built from the result survive moving the whole
/// workspace tree.
#[must_use]
pub fn relative_from(base: &Path, target: &Path) -> PathBuf {
    let base_parts: Vec<_> = base.components().collect();
    let target_parts: Vec<_> = target.components().collect();

    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in &base_parts[common..] {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}
