//! Per-render component context and the payload it produces.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Render-scoped component id. Allocated monotonically, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// DOM-facing form, e.g. `palm-3`.
    pub fn with_prefix(self, prefix: &str) -> String {
        format!("{prefix}{}", self.0)
    }
}

/// A declared piece of component state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub key: String,
    pub value: Value,
    /// Exposed in the page-wide state blob.
    #[serde(default)]
    pub global: bool,
    /// Compiled client expression recomputing this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

/// A declared client action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDecl {
    pub name: String,
    pub arity: u32,
    /// Compiled handler body; arguments are reachable as `args[N]`.
    pub code: String,
}

/// Structured description of an interactive component, shipped to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentPayload {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub state: Vec<StateEntry>,
    pub actions: Vec<ActionDecl>,
}

impl ComponentPayload {
    /// State entries flagged global that carry a usable key.
    pub fn global_state(&self) -> impl Iterator<Item = &StateEntry> {
        self.state.iter().filter(|s| s.global && !s.key.is_empty())
    }
}

/// What one render pass has recorded so far.
#[derive(Debug)]
pub struct RenderContext {
    id: ComponentId,
    name: Option<String>,
    state: Vec<StateEntry>,
    actions: Vec<ActionDecl>,
}

impl RenderContext {
    pub fn new(id: ComponentId, name: Option<String>) -> Self {
        Self {
            id,
            name,
            state: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Record state; a repeated key replaces the earlier entry in place.
    pub fn record_state(&mut self, entry: StateEntry) {
        match self.state.iter_mut().find(|s| s.key == entry.key) {
            Some(slot) => *slot = entry,
            None => self.state.push(entry),
        }
    }

    /// Record an action; a repeated name replaces the earlier one in place.
    pub fn record_action(&mut self, action: ActionDecl) {
        match self.actions.iter_mut().find(|a| a.name == action.name) {
            Some(slot) => *slot = action,
            None => self.actions.push(action),
        }
    }

    pub fn state(&self) -> &[StateEntry] {
        &self.state
    }

    pub fn actions(&self) -> &[ActionDecl] {
        &self.actions
    }

    /// The payload, present only when state or actions were declared.
    pub fn into_payload(self, id_prefix: &str) -> Option<ComponentPayload> {
        if self.state.is_empty() && self.actions.is_empty() {
            return None;
        }
        Some(ComponentPayload {
            id: self.id.with_prefix(id_prefix),
            name: self.name,
            state: self.state,
            actions: self.actions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(key: &str, value: Value, global: bool) -> StateEntry {
        StateEntry {
            key: key.to_string(),
            value,
            global,
            expression: None,
        }
    }

    #[test]
    fn test_no_declarations_no_payload() {
        let ctx = RenderContext::new(ComponentId::new(1), Some("Plain".into()));
        assert!(ctx.into_payload("palm-").is_none());
    }

    #[test]
    fn test_payload_with_state() {
        let mut ctx = RenderContext::new(ComponentId::new(7), None);
        ctx.record_state(state("count", json!(0), false));
        let payload = ctx.into_payload("palm-").unwrap();
        assert_eq!(payload.id, "palm-7");
        assert_eq!(payload.state.len(), 1);
        assert!(payload.actions.is_empty());
    }

    #[test]
    fn test_payload_with_action_only() {
        let mut ctx = RenderContext::new(ComponentId::new(2), None);
        ctx.record_action(ActionDecl {
            name: "go".into(),
            arity: 0,
            code: "go()".into(),
        });
        assert!(ctx.into_payload("c").is_some());
    }

    #[test]
    fn test_repeated_key_replaced_in_place() {
        let mut ctx = RenderContext::new(ComponentId::new(1), None);
        ctx.record_state(state("a", json!(1), false));
        ctx.record_state(state("b", json!(2), false));
        ctx.record_state(state("a", json!(3), true));
        let keys: Vec<_> = ctx.state().iter().map(|s| (s.key.as_str(), s.value.clone())).collect();
        assert_eq!(keys, [("a", json!(3)), ("b", json!(2))]);
    }

    #[test]
    fn test_global_state_filter() {
        let mut ctx = RenderContext::new(ComponentId::new(1), None);
        ctx.record_state(state("local", json!(1), false));
        ctx.record_state(state("", json!(2), true));
        ctx.record_state(state("shared", json!(3), true));
        let payload = ctx.into_payload("p").unwrap();
        let keys: Vec<_> = payload.global_state().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["shared"]);
    }

    #[test]
    fn test_payload_json_shape() {
        let mut ctx = RenderContext::new(ComponentId::new(4), Some("Counter".into()));
        ctx.record_state(state("count", json!(1), true));
        let json = serde_json::to_value(ctx.into_payload("palm-").unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "id": "palm-4",
                "name": "Counter",
                "state": [{"key": "count", "value": 1, "global": true}],
                "actions": []
            })
        );
    }
}
