//! Page context: what the surrounding template needs to finish a page.

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::View;
use crate::component::ComponentPayload;
use crate::script::{ScriptEntry, ScriptTarget, render_scripts};
use crate::utils::html::escape_script_json;

/// Scripts split by placement, the boot component and page-wide state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageContext {
    pub head_scripts: Vec<ScriptEntry>,
    pub body_scripts: Vec<ScriptEntry>,
    /// Payload of the view selected by slug, if it has one.
    pub boot_component: Option<ComponentPayload>,
    /// Global state keys in first-seen order.
    pub global_state: Map<String, Value>,
}

/// Merge per-view output into one page context.
///
/// - head entries go to `head_scripts`, everything else to `body_scripts`
/// - the boot component is looked up by `current_slug`, never scanned for
/// - for global state, the first view (in render order) to declare a key wins
pub fn build_context(views: &[View], current_slug: &str, scripts: Vec<ScriptEntry>) -> PageContext {
    let (head_scripts, body_scripts) = scripts
        .into_iter()
        .partition(|entry| entry.target == ScriptTarget::Head);

    let boot_component = views
        .iter()
        .find(|view| view.slug == current_slug)
        .and_then(|view| view.component.clone());

    let mut global_state = Map::new();
    for payload in views.iter().filter_map(|view| view.component.as_ref()) {
        for entry in payload.global_state() {
            if !global_state.contains_key(&entry.key) {
                global_state.insert(entry.key.clone(), entry.value.clone());
            }
        }
    }

    PageContext {
        head_scripts,
        body_scripts,
        boot_component,
        global_state,
    }
}

impl PageContext {
    /// Script tags for `<head>`.
    pub fn render_head(&self) -> String {
        render_scripts(&self.head_scripts)
    }

    /// Script tags for the end of `<body>`.
    pub fn render_body(&self) -> String {
        render_scripts(&self.body_scripts)
    }

    /// `{"boot": payload|null, "state": {...}}`
    pub fn bootstrap(&self) -> Value {
        json!({
            "boot": self.boot_component,
            "state": self.global_state,
        })
    }

    /// `<script>` assigning the bootstrap blob to `window.<var>`.
    pub fn state_script(&self, global_var: &str) -> String {
        let json = self.bootstrap().to_string();
        format!(
            "<script>window.{global_var}={};</script>\n",
            escape_script_json(&json)
        )
    }
}
