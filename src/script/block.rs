//! Inline script capture.
//!
//! A script block brackets a region of component output: everything written
//! between `start` and `end` is captured instead of becoming HTML, then
//! handed to the registry as source awaiting compilation. Blocks nest; each
//! `start` must be paired with exactly one `end`.

use super::entry::ScriptOptions;
use crate::error::RenderError;
use crate::output::OutputStack;

/// Stack of open script blocks for one render.
#[derive(Debug, Default)]
pub struct ScriptBlock {
    frames: Vec<ScriptOptions>,
}

/// Source captured by a closed block, with the options it was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedScript {
    pub source: String,
    pub options: ScriptOptions,
}

impl ScriptBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a block. Unset options default to `target = "head"`, `once = true`.
    pub fn start(&mut self, out: &mut OutputStack, options: ScriptOptions) {
        self.frames
            .push(options.merged_over(&ScriptOptions::block_defaults()));
        out.open();
    }

    /// Close the innermost block.
    ///
    /// Fails without touching `out` when no block is open. Blank captures
    /// yield `Ok(None)`.
    pub fn end(&mut self, out: &mut OutputStack) -> Result<Option<CapturedScript>, RenderError> {
        let options = self.frames.pop().ok_or(RenderError::UnbalancedScriptEnd)?;
        let source = out.close().unwrap_or_default();
        let source = source.trim();

        if source.is_empty() {
            return Ok(None);
        }
        Ok(Some(CapturedScript {
            source: source.to_string(),
            options,
        }))
    }

    /// Number of blocks currently open.
    pub fn open(&self) -> usize {
        self.frames.len()
    }

    /// Close every open block, discarding what they captured.
    ///
    /// Returns how many were open.
    pub fn abandon(&mut self, out: &mut OutputStack) -> usize {
        let open = self.frames.len();
        for _ in 0..open {
            out.close();
        }
        self.frames.clear();
        open
    }
}
