//! The handle a component renders through.
//!
//! A [`RenderScope`] is the "current context" of one render: it owns the
//! output sink, the open script blocks, the recorded state/actions and the
//! scripts registered so far. It lives on the stack of
//! [`ComponentManager::render`](super::ComponentManager::render), so it is
//! gone when the render returns, whether it succeeded, failed or panicked.

use std::fmt;

use serde_json::{Value, json};

use super::context::{ActionDecl, ComponentId, RenderContext, StateEntry};
use super::manager::{ComponentManager, RenderResult};
use crate::action::{ActionArgument, ExpressionReference, RecordedValue};
use crate::error::RenderError;
use crate::output::OutputStack;
use crate::script::{ScriptBlock, ScriptEntry, ScriptOptions, ScriptRegistry};
use crate::utils::html::escape;

pub struct RenderScope<'m> {
    manager: &'m ComponentManager,
    context: RenderContext,
    out: OutputStack,
    blocks: ScriptBlock,
    registry: ScriptRegistry,
}

/// Everything a finished scope hands back to the manager.
pub(super) struct ScopeParts {
    pub context: RenderContext,
    pub html: String,
    pub open_blocks: usize,
    pub scripts: Vec<ScriptEntry>,
}

impl<'m> RenderScope<'m> {
    pub(super) fn new(manager: &'m ComponentManager, context: RenderContext) -> Self {
        Self {
            manager,
            context,
            out: OutputStack::new(),
            blocks: ScriptBlock::new(),
            registry: ScriptRegistry::new(manager.compiler().clone()),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.context.id()
    }

    /// DOM-facing id, as it appears in the payload and the root hook.
    pub fn dom_id(&self) -> String {
        self.context.id().with_prefix(&self.manager.hooks().id_prefix)
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Write raw HTML (or script source, inside a block).
    pub fn write_raw(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Write text, HTML-escaped.
    pub fn write_text(&mut self, s: &str) {
        self.out.push_str(&escape(s));
    }

    // ------------------------------------------------------------------------
    // State and actions
    // ------------------------------------------------------------------------

    /// Declare component-local state.
    pub fn state(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.record_state(key.into(), value.into(), false, None);
    }

    /// Declare state that also appears in the page-wide state blob.
    pub fn global_state(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.record_state(key.into(), value.into(), true, None);
    }

    /// Declare state recomputed on the client from `expr`.
    ///
    /// The server-side value is `expr.value()`; the source is compiled now
    /// so a bad expression fails the render.
    pub fn computed(
        &mut self,
        key: impl Into<String>,
        expr: &ExpressionReference,
        global: bool,
    ) -> Result<(), RenderError> {
        let js = self.manager.compiler().compile(expr.expression())?;
        let js = js.trim();
        let expression = (!js.is_empty()).then(|| js.to_string());
        self.record_state(key.into(), expr.value().clone(), global, expression);
        Ok(())
    }

    fn record_state(&mut self, key: String, value: Value, global: bool, expression: Option<String>) {
        self.context.record_state(StateEntry {
            key,
            value,
            global,
            expression,
        });
    }

    /// Declare a client action.
    ///
    /// `handler` is called once, on the server, with one placeholder per
    /// argument and returns the handler source. Placeholders print as
    /// `{{arg:N}}` so they survive into the source text for the compiler.
    pub fn action<F>(&mut self, name: impl Into<String>, arity: u32, handler: F) -> Result<(), RenderError>
    where
        F: FnOnce(&[ActionArgument]) -> String,
    {
        let args = ActionArgument::list(arity);
        let source = handler(&args);
        let code = self.manager.compiler().compile(source.trim())?;

        self.context.record_action(ActionDecl {
            name: name.into(),
            arity,
            code: code.trim().to_string(),
        });
        Ok(())
    }

    /// JSON text describing a call of `action` with `args`.
    ///
    /// Meant for an HTML attribute value; escape it when writing.
    pub fn bind(&self, action: &str, args: impl IntoIterator<Item = RecordedValue>) -> String {
        let args: Vec<RecordedValue> = args.into_iter().collect();
        json!({
            "component": self.dom_id(),
            "action": action,
            "args": args,
        })
        .to_string()
    }

    // ------------------------------------------------------------------------
    // Scripts
    // ------------------------------------------------------------------------

    /// Open a script block; output is captured until [`script_end`](Self::script_end).
    pub fn script_start(&mut self, options: ScriptOptions) {
        self.blocks.start(&mut self.out, options);
    }

    /// Close the innermost script block and register its content.
    pub fn script_end(&mut self) -> Result<Option<String>, RenderError> {
        match self.blocks.end(&mut self.out)? {
            Some(captured) => Ok(self
                .registry
                .add_php(&captured.source, &captured.options)?),
            None => Ok(None),
        }
    }

    /// Run `body` inside a script block; the block is closed even when
    /// `body` fails.
    pub fn script<F>(&mut self, options: ScriptOptions, body: F) -> Result<Option<String>, RenderError>
    where
        F: FnOnce(&mut Self) -> Result<(), RenderError>,
    {
        let depth = self.blocks.open();
        self.script_start(options);
        let outcome = body(self);

        let open = self.blocks.open();
        if open <= depth {
            // body closed a block it did not open
            return Err(outcome.err().unwrap_or(RenderError::UnbalancedScriptEnd));
        }
        if let Err(e) = outcome {
            self.discard_blocks_above(depth);
            return Err(e);
        }
        if open > depth + 1 {
            self.discard_blocks_above(depth);
            return Err(RenderError::UnclosedScriptBlocks(open - depth - 1));
        }
        self.script_end()
    }

    fn discard_blocks_above(&mut self, depth: usize) {
        while self.blocks.open() > depth {
            let _ = self.blocks.end(&mut self.out);
        }
    }

    /// Register already-compiled JavaScript.
    pub fn add_js(&mut self, code: &str, options: &ScriptOptions) -> Option<String> {
        self.registry.add_js(code, options)
    }

    /// Compile and register template-dialect source.
    pub fn add_php(&mut self, code: &str, options: &ScriptOptions) -> Result<Option<String>, RenderError> {
        Ok(self.registry.add_php(code, options)?)
    }

    // ------------------------------------------------------------------------
    // Nesting
    // ------------------------------------------------------------------------

    /// Render a child component in its own context.
    ///
    /// The child's scripts move into this scope's registry, so the returned
    /// result carries none and they surface once with the parent. Its HTML
    /// is returned, not written.
    pub fn render_child<F>(&mut self, name: Option<&str>, f: F) -> Result<RenderResult, RenderError>
    where
        F: FnOnce(&mut RenderScope<'_>) -> Result<(), RenderError>,
    {
        let mut child = self.manager.render_named(name, f)?;
        self.registry.extend(std::mem::take(&mut child.scripts));
        Ok(child)
    }

    // ------------------------------------------------------------------------
    // Finish
    // ------------------------------------------------------------------------

    pub(super) fn finish(self) -> ScopeParts {
        let Self {
            context,
            mut out,
            mut blocks,
            mut registry,
            ..
        } = self;

        let open_blocks = blocks.abandon(&mut out);
        ScopeParts {
            context,
            html: out.into_base(),
            open_blocks,
            scripts: registry.flush(),
        }
    }
}

impl fmt::Write for RenderScope<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.out.push_str(s);
        Ok(())
    }
}

impl fmt::Debug for RenderScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScope")
            .field("context", &self.context)
            .field("open_blocks", &self.blocks.open())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
