//! Memoized compilation keyed by source content hash.

use dashmap::DashMap;

use super::{CompileError, ExpressionCompiler};
use crate::debug;
use crate::utils::hash::ContentHash;

/// Remembers compiled output for previously seen source text.
///
/// A miss is not an error: the source is compiled and the result stored.
/// Failures are returned as-is and never cached.
pub struct CachedCompiler<C> {
    inner: C,
    compiled: DashMap<ContentHash, String>,
}

impl<C: ExpressionCompiler> CachedCompiler<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            compiled: DashMap::new(),
        }
    }

    /// Previously compiled output for `source`, if any.
    pub fn lookup(&self, source: &str) -> Option<String> {
        self.compiled
            .get(&ContentHash::of(source))
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    pub fn clear(&self) {
        self.compiled.clear();
    }
}

impl<C: ExpressionCompiler> ExpressionCompiler for CachedCompiler<C> {
    fn compile(&self, source: &str) -> Result<String, CompileError> {
        let key = ContentHash::of(source);
        if let Some(hit) = self.compiled.get(&key) {
            debug!("compile"; "cache hit {}", key);
            return Ok(hit.value().clone());
        }

        let js = self.inner.compile(source)?;
        self.compiled.insert(key, js.clone());
        Ok(js)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and fails on sources containing `!`.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl ExpressionCompiler for Counting {
        fn compile(&self, source: &str) -> Result<String, CompileError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if source.contains('!') {
                return Err(CompileError::new(source, "bang"));
            }
            Ok(source.to_uppercase())
        }
    }

    #[test]
    fn test_cache_hit_skips_inner() {
        let cached = CachedCompiler::new(Counting::default());
        assert_eq!(cached.compile("a").unwrap(), "A");
        assert_eq!(cached.compile("a").unwrap(), "A");
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.lookup("a").as_deref(), Some("A"));
        assert_eq!(cached.len(), 1);
    }

    #[test]
    fn test_cache_miss_is_not_error() {
        let cached = CachedCompiler::new(Counting::default());
        assert!(cached.lookup("never").is_none());
        assert!(cached.is_empty());
    }

    #[test]
    fn test_failures_not_cached() {
        let cached = CachedCompiler::new(Counting::default());
        assert!(cached.compile("x!").is_err());
        assert!(cached.compile("x!").is_err());
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert!(cached.is_empty());
    }

    #[test]
    fn test_clear() {
        let cached = CachedCompiler::new(Counting::default());
        cached.compile("a").unwrap();
        cached.clear();
        assert!(cached.lookup("a").is_none());
    }
}
