//! Request-scoped page sessions.
//!
//! A [`PageSession`] lives in tokio task-local storage for the duration of
//! [`scope`] or [`scope_async`]. Code deep inside a request reaches it with
//! [`with`] instead of threading it through every call. Each task sees only
//! its own session, so concurrent requests never share ids or scripts.

use std::cell::RefCell;
use std::future::Future;

use crate::compiler::{ExpressionCompiler, SharedCompiler};
use crate::component::{ComponentManager, RenderScope};
use crate::config::{HooksConfig, PalmConfig};
use crate::error::RenderError;
use crate::page::{Page, PageContext, View};

tokio::task_local! {
    static SESSION: RefCell<PageSession>;
}

/// Component manager plus page under assembly, for one request.
#[derive(Debug)]
pub struct PageSession {
    manager: ComponentManager,
    page: Page,
}

impl PageSession {
    pub fn new(compiler: SharedCompiler, hooks: HooksConfig) -> Self {
        Self {
            page: Page::new(compiler.clone()),
            manager: ComponentManager::new(compiler, hooks),
        }
    }

    pub fn from_config<C>(inner: C, config: &PalmConfig) -> Self
    where
        C: ExpressionCompiler + 'static,
    {
        let manager = ComponentManager::from_config(inner, config);
        Self {
            page: Page::new(manager.compiler().clone()),
            manager,
        }
    }

    pub fn manager(&self) -> &ComponentManager {
        &self.manager
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Render a component and add it to the page as `slug`.
    pub fn render_view<F>(&mut self, slug: &str, name: Option<&str>, f: F) -> Result<&View, RenderError>
    where
        F: FnOnce(&mut RenderScope<'_>) -> Result<(), RenderError>,
    {
        let result = self.manager.render_named(name, f)?;
        Ok(self.page.push(slug, result))
    }

    pub fn finish(&mut self, current_slug: &str) -> PageContext {
        self.page.finish(current_slug)
    }
}

/// Run `f` with `session` installed for the current task.
pub fn scope<R>(session: PageSession, f: impl FnOnce() -> R) -> R {
    SESSION.sync_scope(RefCell::new(session), f)
}

/// Await `fut` with `session` installed for it.
pub async fn scope_async<F>(session: PageSession, fut: F) -> F::Output
where
    F: Future,
{
    SESSION.scope(RefCell::new(session), fut).await
}

/// Whether a session is installed for the current task.
pub fn is_active() -> bool {
    SESSION.try_with(|_| ()).is_ok()
}

/// Borrow the current task's session.
pub fn with<R>(f: impl FnOnce(&mut PageSession) -> R) -> Result<R, RenderError> {
    SESSION
        .try_with(|cell| {
            let mut session = cell.try_borrow_mut().map_err(|_| RenderError::SessionBusy)?;
            Ok::<R, RenderError>(f(&mut session))
        })
        .map_err(|_| RenderError::NoActiveSession)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::PassthroughCompiler;
    use crate::script::ScriptOptions;
    use std::sync::Arc;
    use std::time::Duration;

    fn session() -> PageSession {
        PageSession::new(Arc::new(PassthroughCompiler), HooksConfig::default())
    }

    #[test]
    fn test_with_outside_scope() {
        assert!(!is_active());
        let err = with(|_| ()).unwrap_err();
        assert!(matches!(err, RenderError::NoActiveSession));
    }

    #[test]
    fn test_sync_scope() {
        let ctx = scope(session(), || {
            assert!(is_active());
            with(|s| {
                s.render_view("home", Some("Home"), |c| {
                    c.state("open", true);
                    c.write_raw("<section></section>");
                    c.add_js("boot()", &ScriptOptions::new());
                    Ok(())
                })
                .map(|_| ())
            })
            .unwrap()
            .unwrap();
            with(|s| s.finish("home")).unwrap()
        });

        assert_eq!(ctx.body_scripts[0].code, "boot()");
        assert_eq!(ctx.boot_component.unwrap().id, "palm-1");
        assert!(!is_active());
    }

    #[test]
    fn test_nested_with_is_busy() {
        scope(session(), || {
            let inner = with(|_| with(|_| ())).unwrap();
            assert!(matches!(inner, Err(RenderError::SessionBusy)));
        });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_tasks_have_isolated_sessions() {
        let spawn = |slug: &'static str, code: &'static str| {
            tokio::spawn(scope_async(session(), async move {
                with(|s| {
                    s.render_view(slug, None, |c| {
                        c.state("slug", slug);
                        c.add_js(code, &ScriptOptions::new());
                        Ok(())
                    })
                    .map(|_| ())
                })
                .unwrap()
                .unwrap();
                tokio::time::sleep(Duration::from_millis(10)).await;
                with(|s| s.finish(slug)).unwrap()
            }))
        };

        let a = spawn("a", "a()");
        let b = spawn("b", "b()");
        let (a, b) = (a.await.unwrap(), b.await.unwrap());

        assert_eq!(a.body_scripts.len(), 1);
        assert_eq!(a.body_scripts[0].code, "a()");
        assert_eq!(b.body_scripts[0].code, "b()");
        // each session numbers its components from 1
        assert_eq!(a.boot_component.unwrap().id, "palm-1");
        assert_eq!(b.boot_component.unwrap().id, "palm-1");
    }
}
