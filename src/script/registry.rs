//! Content-addressed script registry.
//!
//! Entries are keyed by hash, so identical compiled code registered by any
//! number of components collapses to a single entry. Output size follows
//! unique behavior, not instance count.

use rustc_hash::FxHashMap;

use super::entry::{ScriptEntry, ScriptOptions};
use crate::compiler::{CompileError, SharedCompiler};
use crate::debug;
use crate::utils::hash::ContentHash;

/// Hash-keyed map of compiled scripts, kept in registration order.
///
/// Drained by [`ScriptRegistry::flush`]; nothing expires in between.
pub struct ScriptRegistry {
    compiler: SharedCompiler,
    entries: Vec<ScriptEntry>,
    /// hash -> position in `entries`
    index: FxHashMap<String, usize>,
}

impl ScriptRegistry {
    pub fn new(compiler: SharedCompiler) -> Self {
        Self {
            compiler,
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn compiler(&self) -> &SharedCompiler {
        &self.compiler
    }

    /// Compile template-dialect source and register the result.
    ///
    /// Blank input and blank compiled output are skipped. Returns the hash of
    /// the stored entry.
    pub fn add_php(
        &mut self,
        code: &str,
        options: &ScriptOptions,
    ) -> Result<Option<String>, CompileError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        let js = self.compiler.compile(code)?;
        if js.trim().is_empty() {
            debug!("script"; "compiled output empty, dropped");
            return Ok(None);
        }

        Ok(self.add_js(&js, options))
    }

    /// Register JavaScript as-is. Returns the hash of the stored entry.
    pub fn add_js(&mut self, code: &str, options: &ScriptOptions) -> Option<String> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }

        let hash = match options.hash.as_deref() {
            Some(hash) if !hash.is_empty() => hash.to_string(),
            _ => ContentHash::of(code).short(),
        };

        self.insert(ScriptEntry {
            hash: hash.clone(),
            code: code.to_string(),
            target: options.resolved_target(),
            attrs: options.attrs.clone(),
            once: options.resolved_once(),
        });
        Some(hash)
    }

    /// Store a ready entry. An existing entry with the same hash is
    /// overwritten in place and keeps its original position.
    pub fn insert(&mut self, entry: ScriptEntry) {
        match self.index.get(&entry.hash) {
            Some(&pos) => {
                debug!("script"; "dedup hit {}", entry.hash);
                self.entries[pos] = entry;
            }
            None => {
                self.index.insert(entry.hash.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = ScriptEntry>) {
        for entry in entries {
            self.insert(entry);
        }
    }

    pub fn get(&self, hash: &str) -> Option<&ScriptEntry> {
        self.index.get(hash).map(|&pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take every entry in registration order and leave the registry empty.
    pub fn flush(&mut self) -> Vec<ScriptEntry> {
        self.index.clear();
        std::mem::take(&mut self.entries)
    }
}

impl std::fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}
