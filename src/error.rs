//! Render error types.

use std::fmt;

use thiserror::Error;

use crate::compiler::CompileError;

/// Everything that can abort a component render.
///
/// There is no partial success: a render either returns its full result
/// or one of these.
#[derive(Debug, Error)]
pub enum RenderError {
    /// `script_end` with no script block open.
    #[error("script block closed but none is open")]
    UnbalancedScriptEnd,

    /// The renderer returned while script blocks were still open.
    #[error("{0} script block(s) left open at end of render")]
    UnclosedScriptBlocks(usize),

    #[error("script compilation failed")]
    Compile(#[from] CompileError),

    #[error("failed to write component output")]
    Write(#[from] fmt::Error),

    #[error("no page session is active on this task")]
    NoActiveSession,

    /// `session::with` called from inside another `session::with`.
    #[error("page session is already borrowed")]
    SessionBusy,

    /// Failure raised by the component's own rendering code.
    #[error(transparent)]
    Component(#[from] anyhow::Error),
}

impl RenderError {
    /// Authoring bugs in script block usage, as opposed to runtime failures.
    pub const fn is_protocol(&self) -> bool {
        matches!(self, Self::UnbalancedScriptEnd | Self::UnclosedScriptBlocks(_))
    }
}
