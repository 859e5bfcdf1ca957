//! Page assembly.
//!
//! A page is several independently rendered views. Their scripts are merged
//! into one page registry (identical code collapses by hash across views)
//! which is flushed exactly once, when the page is finished.
//!
//! ```text
//! render(view A) ─┐
//! render(view B) ─┼─► Page::push ─► page registry ─► Page::finish ─► PageContext
//! render(view C) ─┘                                   (single flush)
//! ```

mod context;

pub use context::{PageContext, build_context};

use serde::Serialize;

use crate::compiler::SharedCompiler;
use crate::component::{ComponentPayload, RenderResult};
use crate::debug;
use crate::script::ScriptRegistry;

/// One rendered view on a page, without its scripts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub slug: String,
    pub html: String,
    pub component: Option<ComponentPayload>,
}

/// Collects the views rendered for one page.
#[derive(Debug)]
pub struct Page {
    views: Vec<View>,
    registry: ScriptRegistry,
}

impl Page {
    pub fn new(compiler: SharedCompiler) -> Self {
        Self {
            views: Vec::new(),
            registry: ScriptRegistry::new(compiler),
        }
    }

    /// Record a rendered view; its scripts join the page registry.
    pub fn push(&mut self, slug: impl Into<String>, result: RenderResult) -> &View {
        let RenderResult {
            html,
            component,
            scripts,
        } = result;

        self.registry.extend(scripts);
        self.views.push(View {
            slug: slug.into(),
            html,
            component,
        });
        &self.views[self.views.len() - 1]
    }

    /// Views in render order.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn view(&self, slug: &str) -> Option<&View> {
        self.views.iter().find(|v| v.slug == slug)
    }

    /// Number of distinct scripts waiting for the flush.
    pub fn pending_scripts(&self) -> usize {
        self.registry.len()
    }

    /// Drain the page registry and build the page context.
    ///
    /// Calling it again without new views yields a context with no scripts.
    pub fn finish(&mut self, current_slug: &str) -> PageContext {
        let scripts = self.registry.flush();
        debug!("page"; "{} view(s), {} script(s) after dedup", self.views.len(), scripts.len());
        build_context(&self.views, current_slug, scripts)
    }
}
