//! Component render context and manager.
//!
//! One call to [`ComponentManager::render`] isolates one render pass:
//!
//! 1. a fresh [`ComponentId`] and [`RenderScope`] are created
//! 2. the renderer writes HTML and declares state, actions and scripts
//! 3. the context yields a [`ComponentPayload`] if anything was declared
//! 4. the payload id is hooked onto the HTML root
//! 5. the scope's script registry is drained into the result

mod context;
mod hooks;
mod manager;
mod scope;

pub use context::{ActionDecl, ComponentId, ComponentPayload, RenderContext, StateEntry};
pub use hooks::attach as attach_hook;
pub use manager::{ComponentManager, RenderResult};
pub use scope::RenderScope;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionArgument, ExpressionReference, RecordedValue};
    use crate::compiler::{CompileError, ExpressionCompiler, PassthroughCompiler};
    use crate::config::HooksConfig;
    use crate::error::RenderError;
    use crate::script::{ScriptOptions, ScriptTarget};
    use serde_json::json;
    use std::fmt::Write;
    use std::sync::Arc;

    fn manager() -> ComponentManager {
        ComponentManager::new(Arc::new(PassthroughCompiler), HooksConfig::default())
    }

    /// Rejects any source mentioning `eval`.
    struct Strict;

    impl ExpressionCompiler for Strict {
        fn compile(&self, source: &str) -> Result<String, CompileError> {
            if source.contains("eval") {
                return Err(CompileError::new(source, "eval is not allowed"));
            }
            PassthroughCompiler.compile(source)
        }
    }

    #[test]
    fn test_plain_render() {
        let result = manager()
            .render(|s| {
                write!(s, "<p>{}</p>", 42)?;
                Ok(())
            })
            .unwrap();
        assert_eq!(result.html, "<p>42</p>");
        assert!(result.component.is_none());
        assert!(result.scripts.is_empty());
    }

    #[test]
    fn test_state_produces_payload_and_hook() {
        let result = manager()
            .render_named(Some("Counter"), |s| {
                s.state("count", 3);
                s.write_raw("<div class=\"counter\">3</div>");
                Ok(())
            })
            .unwrap();

        let payload = result.component.unwrap();
        assert_eq!(payload.id, "palm-1");
        assert_eq!(payload.name.as_deref(), Some("Counter"));
        assert_eq!(payload.state[0].value, json!(3));
        assert_eq!(
            result.html,
            r#"<div data-palm-component="palm-1" class="counter">3</div>"#
        );
    }

    #[test]
    fn test_write_text_escapes() {
        let result = manager()
            .render(|s| {
                s.write_text("<b>&</b>");
                Ok(())
            })
            .unwrap();
        assert_eq!(result.html, "&lt;b&gt;&amp;&lt;/b&gt;");
    }

    #[test]
    fn test_ids_never_reused() {
        let m = manager();
        let mut seen = Vec::new();
        for _ in 0..3 {
            m.render(|s| {
                seen.push(s.id());
                s.render_child(None, |c| {
                    seen.push(c.id());
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
        }
        let raw: Vec<u64> = seen.iter().map(|id| id.get()).collect();
        assert_eq!(raw, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_script_block_registered_and_drained() {
        let m = manager();
        let result = m
            .render(|s| {
                s.write_raw("<button>go</button>");
                s.script_start(ScriptOptions::new());
                s.write_raw("  start({{arg:0}});  ");
                s.script_end()?;
                Ok(())
            })
            .unwrap();

        assert_eq!(result.html, "<button>go</button>");
        assert_eq!(result.scripts.len(), 1);
        let entry = &result.scripts[0];
        assert_eq!(entry.code, "start(args[0]);");
        assert_eq!(entry.target, ScriptTarget::Head);
        assert!(entry.once);

        // next render starts with an empty registry
        let next = m.render(|_| Ok(())).unwrap();
        assert!(next.scripts.is_empty());
    }

    #[test]
    fn test_identical_blocks_dedup_within_render() {
        let result = manager()
            .render(|s| {
                for _ in 0..3 {
                    s.script(ScriptOptions::new(), |s| {
                        s.write_raw("tick();");
                        Ok(())
                    })?;
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(result.scripts.len(), 1);
    }

    #[test]
    fn test_renderer_error_propagates_and_manager_recovers() {
        let m = manager();
        let err = m
            .render(|s| {
                s.script_start(ScriptOptions::new());
                s.write_raw("half");
                Err(anyhow::anyhow!("template blew up").into())
            })
            .unwrap_err();
        assert!(matches!(err, RenderError::Component(_)));

        let result = m
            .render(|s| {
                s.write_raw("fresh");
                Ok(())
            })
            .unwrap();
        assert_eq!(result.html, "fresh");
        assert!(result.scripts.is_empty());
    }

    #[test]
    fn test_unbalanced_end_is_protocol_error() {
        let err = manager()
            .render(|s| {
                s.script_end()?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, RenderError::UnbalancedScriptEnd));
        assert!(err.is_protocol());
    }

    #[test]
    fn test_recover_after_unbalanced_end_in_same_render() {
        let result = manager()
            .render(|s| {
                assert!(s.script_end().is_err());
                s.script_start(ScriptOptions::new().target("body"));
                s.write_raw("after();");
                s.script_end()?;
                Ok(())
            })
            .unwrap();
        assert_eq!(result.scripts[0].code, "after();");
        assert_eq!(result.scripts[0].target, ScriptTarget::Body);
    }

    #[test]
    fn test_unclosed_block_fails_render() {
        let m = manager();
        let err = m
            .render(|s| {
                s.write_raw("<p>");
                s.script_start(ScriptOptions::new());
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, RenderError::UnclosedScriptBlocks(1)));

        let result = m.render(|s| {
            s.write_raw("<p>ok</p>");
            Ok(())
        });
        assert_eq!(result.unwrap().html, "<p>ok</p>");
    }

    #[test]
    fn test_compile_failure_fails_render() {
        let m = ComponentManager::new(Arc::new(Strict), HooksConfig::default());
        let err = m
            .render(|s| {
                s.script(ScriptOptions::new(), |s| {
                    s.write_raw("eval(x)");
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, RenderError::Compile(_)));
    }

    #[test]
    fn test_script_closure_closes_on_error() {
        let result = manager()
            .render(|s| {
                let failed = s.script(ScriptOptions::new(), |s| {
                    s.write_raw("never();");
                    Err(RenderError::Component(anyhow::anyhow!("inner")))
                });
                assert!(failed.is_err());
                s.write_raw("<p>still here</p>");
                Ok(())
            })
            .unwrap();
        assert_eq!(result.html, "<p>still here</p>");
        assert!(result.scripts.is_empty());
    }

    #[test]
    fn test_script_closure_rejects_dangling_inner_block() {
        let err = manager()
            .render(|s| {
                s.script(ScriptOptions::new(), |s| {
                    s.script_start(ScriptOptions::new());
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, RenderError::UnclosedScriptBlocks(1)));
    }

    #[test]
    fn test_child_scripts_surface_with_parent() {
        let result = manager()
            .render(|s| {
                s.add_js("shared()", &ScriptOptions::new());
                let child = s.render_child(Some("Item"), |c| {
                    c.state("done", false);
                    c.add_js("shared()", &ScriptOptions::new());
                    c.add_js("item()", &ScriptOptions::new());
                    c.write_raw("<li>x</li>");
                    Ok(())
                })?;
                assert!(child.scripts.is_empty());
                assert_eq!(child.component.as_ref().unwrap().id, "palm-2");
                s.write_raw("<ul>");
                s.write_raw(&child.html);
                s.write_raw("</ul>");
                Ok(())
            })
            .unwrap();

        let codes: Vec<_> = result.scripts.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["shared()", "item()"]);
        assert_eq!(result.html, r#"<ul><li data-palm-component="palm-2">x</li></ul>"#);
        assert!(result.component.is_none());
    }

    #[test]
    fn test_action_recording() {
        let result = manager()
            .render(|s| {
                s.action("add", 2, |args| format!("total += {} * {};", args[0], args[1]))?;
                s.write_raw("<form></form>");
                Ok(())
            })
            .unwrap();

        let action = &result.component.unwrap().actions[0];
        assert_eq!(action.name, "add");
        assert_eq!(action.arity, 2);
        assert_eq!(action.code, "total += args[0] * args[1];");
    }

    #[test]
    fn test_computed_state() {
        let result = manager()
            .render(|s| {
                let encoded = ExpressionReference::encode("items.length");
                s.computed("size", &ExpressionReference::new(2, encoded, true), true)?;
                Ok(())
            })
            .unwrap();

        let entry = &result.component.unwrap().state[0];
        assert_eq!(entry.value, json!(2));
        assert!(entry.global);
        assert_eq!(entry.expression.as_deref(), Some("items.length"));
    }

    #[test]
    fn test_bind_json() {
        manager()
            .render(|s| {
                let bound = s.bind(
                    "select",
                    [RecordedValue::from(json!(5)), ActionArgument::new(0).into()],
                );
                let value: serde_json::Value = serde_json::from_str(&bound).unwrap();
                assert_eq!(
                    value,
                    json!({
                        "component": "palm-1",
                        "action": "select",
                        "args": [5, {"type": "arg", "index": 0}]
                    })
                );
                Ok(())
            })
            .unwrap();
    }
}
