use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    schema::{RuleEntry, RulesMeta},
};

/// Reserved key holding rule-file metadata.
pub const META_KEY: &str = "_meta";
/// Bookkeeping key marking linker-owned entries.
pub const LINKED_KEY: &str = "_linked";

/// Outcome of merging one skill's rule into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The linker-owned entry was written (created or refreshed).
    Merged,
    /// A project-owned entry occupies the name; left untouched.
    KeptProjectRule,
}

/// Whether a raw entry is linker-owned.
///
/// Project entries either omit `_linked` or set it to something other than
/// `true`; both mean tooling must keep its hands off.
#[must_use]
pub fn is_linked_entry(entry: &Value) -> bool {
    entry
        .get(LINKED_KEY)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// The rule file contents: skill entries plus the reserved `_meta` block.
///
/// Backed by a raw JSON map so project-authored entries, `_meta`, and any
/// unknown fields round-trip unchanged; only linker-owned entries go through
/// [`RuleEntry`].
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    entries: Map<String, Value>,
}

impl RuleTable {
    /// Table with the default `_meta` block and no rules.
    #[must_use]
    pub fn with_default_meta() -> Self {
        let meta = RulesMeta::default();
        let mut table = Self::default();
        table.entries.insert(
            META_KEY.to_string(),
            serde_json::json!({
                "version": meta.version,
                "description": meta.description,
            }),
        );
        table
    }

    /// Iterate skill entries in table order, `_meta` excluded.
    pub fn skills(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter().filter(|(k, _)| k.as_str() != META_KEY)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        if name == META_KEY {
            return None;
        }
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether the named entry exists and is linker-owned.
    #[must_use]
    pub fn is_linked(&self, name: &str) -> bool {
        self.get(name).is_some_and(is_linked_entry)
    }

    /// Names of all linker-owned entries, in table order.
    #[must_use]
    pub fn linked_names(&self) -> Vec<String> {
        self.skills()
            .filter(|(_, entry)| is_linked_entry(entry))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// The parsed `_meta` block, if present and well-formed.
    #[must_use]
    pub fn meta(&self) -> Option<RulesMeta> {
        let value = self.entries.get(META_KEY)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Number of skill entries (`_meta` excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.skills().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge one linker-built entry, honoring project ownership: an existing
    /// entry without `_linked: true` is left byte-for-byte as it was, and the
    /// reserved `_meta` block can never be written through here.
    pub fn merge(&mut self, name: &str, entry: &RuleEntry) -> Result<MergeOutcome> {
        if name == META_KEY {
            return Ok(MergeOutcome::KeptProjectRule);
        }
        if let Some(existing) = self.get(name)
            && !is_linked_entry(existing)
        {
            return Ok(MergeOutcome::KeptProjectRule);
        }
        let value = serde_json::to_value(entry).map_err(Error::Serialize)?;
        self.entries.insert(name.to_string(), value);
        Ok(MergeOutcome::Merged)
    }

    /// Remove the named entries unconditionally, returning how many existed.
    /// Callers pre-filter to linker-owned names; `_meta` can never be removed.
    pub fn unmerge<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = 0;
        for name in names {
            let name = name.as_ref();
            if name == META_KEY {
                continue;
            }
            if self.entries.remove(name).is_some() {
                removed += 1;
            }
        }
        removed
    }
}

/// Persistent rule-table storage with atomic writes.
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the table, returning one holding only the default `_meta` when
    /// the file does not exist. Malformed JSON is a hard error: proceeding
    /// would clobber whatever the project had in the file.
    pub fn load(&self) -> Result<RuleTable> {
        if !self.path.exists() {
            return Ok(RuleTable::with_default_meta());
        }
        let data = std::fs::read_to_string(&self.path)?;
        let entries: Map<String, Value> =
            serde_json::from_str(&data).map_err(|source| Error::json(&self.path, source))?;
        Ok(RuleTable { entries })
    }

    /// Save atomically via temp file + rename.
    pub fn save(&self, table: &RuleTable) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(&table.entries).map_err(Error::Serialize)?;
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
