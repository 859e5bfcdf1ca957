//! Script compilation seam.
//!
//! Inline script captured during a render is written in the template dialect
//! and must be translated to JavaScript before it can be shipped. The
//! translation itself lives behind [`ExpressionCompiler`]; this module only
//! provides the trait, its error type and a few composable wrappers.
//!
//! ```text
//! source ──► CachedCompiler ──► MinifyingCompiler ──► inner compiler ──► JS
//! ```

mod cache;
mod minify;

pub use cache::CachedCompiler;
pub use minify::{MinifyingCompiler, minify_js};

use std::sync::Arc;

use thiserror::Error;

use crate::config::ScriptsConfig;

/// Hard failure while translating source to JavaScript.
#[derive(Debug, Clone, Error)]
#[error("cannot compile `{excerpt}`: {message}")]
pub struct CompileError {
    /// Leading part of the offending source.
    pub excerpt: String,
    pub message: String,
}

impl CompileError {
    pub fn new(source: &str, message: impl Into<String>) -> Self {
        const EXCERPT_CHARS: usize = 40;
        let mut excerpt: String = source.chars().take(EXCERPT_CHARS).collect();
        if source.chars().count() > EXCERPT_CHARS {
            excerpt.push('…');
        }
        Self {
            excerpt,
            message: message.into(),
        }
    }
}

/// Translates template-dialect source into JavaScript.
///
/// Implementations must be deterministic: equal input yields equal output,
/// which is what lets identical behavior from different components collapse
/// to one script. An empty result means "nothing to emit".
pub trait ExpressionCompiler: Send + Sync {
    fn compile(&self, source: &str) -> Result<String, CompileError>;
}

impl<C: ExpressionCompiler + ?Sized> ExpressionCompiler for Arc<C> {
    fn compile(&self, source: &str) -> Result<String, CompileError> {
        (**self).compile(source)
    }
}

impl<C: ExpressionCompiler + ?Sized> ExpressionCompiler for Box<C> {
    fn compile(&self, source: &str) -> Result<String, CompileError> {
        (**self).compile(source)
    }
}

/// Shared handle used by registries and managers.
pub type SharedCompiler = Arc<dyn ExpressionCompiler>;

/// Wrap `inner` according to the `[scripts]` config section.
pub fn configure<C>(inner: C, config: &ScriptsConfig) -> SharedCompiler
where
    C: ExpressionCompiler + 'static,
{
    match (config.minify, config.cache) {
        (true, true) => Arc::new(CachedCompiler::new(MinifyingCompiler::new(inner))),
        (true, false) => Arc::new(MinifyingCompiler::new(inner)),
        (false, true) => Arc::new(CachedCompiler::new(inner)),
        (false, false) => Arc::new(inner),
    }
}

// ============================================================================
// PassthroughCompiler
// ============================================================================

/// Compiler for source that is already JavaScript.
///
/// Only argument placeholders are rewritten: `{{arg:N}}` becomes `args[N]`.
/// A placeholder with a non-numeric index is a compile error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCompiler;

impl ExpressionCompiler for PassthroughCompiler {
    fn compile(&self, source: &str) -> Result<String, CompileError> {
        const OPEN: &str = "{{arg:";
        const CLOSE: &str = "}}";

        let mut out = String::with_capacity(source.len());
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len()..];
            let Some(end) = after.find(CLOSE) else {
                return Err(CompileError::new(source, "unterminated argument placeholder"));
            };
            let index: u32 = after[..end].trim().parse().map_err(|_| {
                CompileError::new(source, format!("bad argument index `{}`", &after[..end]))
            })?;
            out.push_str(&format!("args[{index}]"));
            rest = &after[end + CLOSE.len()..];
        }
        out.push_str(rest);

        Ok(out.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_rewrites_placeholders() {
        let js = PassthroughCompiler
            .compile("  count += {{arg:0}} * {{arg:12}};  ")
            .unwrap();
        assert_eq!(js, "count += args[0] * args[12];");
    }

    #[test]
    fn test_passthrough_plain_source() {
        assert_eq!(PassthroughCompiler.compile("a()").unwrap(), "a()");
        assert_eq!(PassthroughCompiler.compile("   ").unwrap(), "");
    }

    #[test]
    fn test_passthrough_rejects_bad_placeholder() {
        let err = PassthroughCompiler.compile("x({{arg:first}})").unwrap_err();
        assert!(err.message.contains("first"));

        let err = PassthroughCompiler.compile("x({{arg:1").unwrap_err();
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_compile_error_excerpt_truncated() {
        let long = "x".repeat(100);
        let err = CompileError::new(&long, "boom");
        assert_eq!(err.excerpt.chars().count(), 41);
        assert!(err.to_string().ends_with("boom"));
    }

    #[test]
    fn test_configure_respects_flags() {
        let config = ScriptsConfig {
            minify: false,
            cache: false,
        };
        let compiler = configure(PassthroughCompiler, &config);
        assert_eq!(compiler.compile("{{arg:1}}").unwrap(), "args[1]");
    }
}
