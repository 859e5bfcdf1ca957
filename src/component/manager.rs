//! Component render manager.
//!
//! ```text
//! Idle ──render()──► Rendering ──renderer returns──► Finalizing ──► Idle
//!                        │                               │
//!                  output captured              payload, hooks, registry drained
//! ```

use std::cell::Cell;

use serde::Serialize;

use super::context::{ComponentId, ComponentPayload, RenderContext};
use super::hooks;
use super::scope::RenderScope;
use crate::compiler::{self, ExpressionCompiler, SharedCompiler};
use crate::config::{HooksConfig, PalmConfig};
use crate::debug;
use crate::error::RenderError;
use crate::script::ScriptEntry;

/// Output of one component render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderResult {
    pub html: String,
    /// Present only when the component declared state or actions.
    pub component: Option<ComponentPayload>,
    /// Scripts registered during the render, in registration order.
    pub scripts: Vec<ScriptEntry>,
}

/// Runs component renders for one request.
///
/// Holds the id counter, so ids stay unique across every render (nested
/// ones included) made through the same manager. Create one per request.
pub struct ComponentManager {
    compiler: SharedCompiler,
    hooks: HooksConfig,
    next_id: Cell<u64>,
}

impl ComponentManager {
    pub fn new(compiler: SharedCompiler, hooks: HooksConfig) -> Self {
        Self {
            compiler,
            hooks,
            next_id: Cell::new(1),
        }
    }

    /// Build a manager with the compiler wrapped per `[scripts]`.
    pub fn from_config<C>(inner: C, config: &PalmConfig) -> Self
    where
        C: ExpressionCompiler + 'static,
    {
        Self::new(compiler::configure(inner, &config.scripts), config.hooks.clone())
    }

    pub fn compiler(&self) -> &SharedCompiler {
        &self.compiler
    }

    pub fn hooks(&self) -> &HooksConfig {
        &self.hooks
    }

    fn allocate_id(&self) -> ComponentId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        ComponentId::new(id)
    }

    /// Render an anonymous component.
    pub fn render<F>(&self, f: F) -> Result<RenderResult, RenderError>
    where
        F: FnOnce(&mut RenderScope<'_>) -> Result<(), RenderError>,
    {
        self.render_named(None, f)
    }

    /// Render a component, recording `name` in its payload.
    ///
    /// The scope handed to `f` is the only current context for the duration
    /// of the call. Whatever `f` returns, open script blocks are closed and
    /// the scope's registry is drained before this returns.
    pub fn render_named<F>(&self, name: Option<&str>, f: F) -> Result<RenderResult, RenderError>
    where
        F: FnOnce(&mut RenderScope<'_>) -> Result<(), RenderError>,
    {
        let id = self.allocate_id();
        debug!("render"; "start #{}{}", id.get(), name.map(|n| format!(" ({n})")).unwrap_or_default());

        let mut scope = RenderScope::new(self, RenderContext::new(id, name.map(str::to_string)));
        let outcome = f(&mut scope);
        let parts = scope.finish();

        if let Err(e) = outcome {
            debug!("render"; "#{} failed: {}", id.get(), e);
            return Err(e);
        }
        if parts.open_blocks > 0 {
            return Err(RenderError::UnclosedScriptBlocks(parts.open_blocks));
        }

        let component = parts.context.into_payload(&self.hooks.id_prefix);
        let html = match &component {
            Some(payload) => hooks::attach(&parts.html, &self.hooks.attribute, &payload.id),
            None => parts.html,
        };

        debug!("render"; "#{} done, {} script(s)", id.get(), parts.scripts.len());
        Ok(RenderResult {
            html,
            component,
            scripts: parts.scripts,
        })
    }
}

impl std::fmt::Debug for ComponentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentManager")
            .field("hooks", &self.hooks)
            .field("next_id", &self.next_id.get())
            .finish_non_exhaustive()
    }
}
