//! JavaScript minification of compiled output, via oxc.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::{CompileError, ExpressionCompiler};
use crate::debug;

/// Minify JavaScript source code.
///
/// Returns `None` when the source does not parse as a script.
pub fn minify_js(source: &str) -> Option<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        // Top-level names are shared across scripts on a page; keep them.
        mangle: None,
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}

/// Runs the inner compiler, then minifies what it produced.
///
/// Output oxc cannot parse is passed through unminified.
pub struct MinifyingCompiler<C> {
    inner: C,
}

impl<C: ExpressionCompiler> MinifyingCompiler<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: ExpressionCompiler> ExpressionCompiler for MinifyingCompiler<C> {
    fn compile(&self, source: &str) -> Result<String, CompileError> {
        let js = self.inner.compile(source)?;
        if js.trim().is_empty() {
            return Ok(js);
        }
        match minify_js(&js) {
            Some(min) => Ok(min),
            None => {
                debug!("compile"; "minifier could not parse output, keeping it as is");
                Ok(js)
            }
        }
    }
}
