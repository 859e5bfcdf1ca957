//! Page fixtures: JSON descriptions of the views that make up one page.
//!
//! ```json
//! {
//!   "title": "Shop",
//!   "slug": "cart",
//!   "views": [{
//!     "slug": "cart",
//!     "name": "Cart",
//!     "html": "<section class=\"cart\">…</section>",
//!     "state": [{ "key": "items", "value": 3, "global": true }],
//!     "actions": [{ "name": "add", "arity": 1, "source": "items += {{arg:0}}" }],
//!     "scripts": [{ "code": "initCart()", "target": "body", "attrs": { "defer": true } }]
//!   }]
//! }
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use palm::component::RenderScope;
use palm::error::RenderError;
use palm::script::ScriptOptions;
use palm::session::PageSession;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageFixture {
    pub title: Option<String>,
    /// View that boots on the client when no slug is given on the command line.
    pub slug: Option<String>,
    pub views: Vec<ViewFixture>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewFixture {
    pub slug: String,
    pub name: Option<String>,
    pub html: String,
    pub state: Vec<StateFixture>,
    pub actions: Vec<ActionFixture>,
    pub scripts: Vec<ScriptFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateFixture {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub global: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionFixture {
    pub name: String,
    #[serde(default)]
    pub arity: u32,
    pub source: String,
}

/// One script of a view.
///
/// `block` scripts go through a script block, like inline template
/// markup would. Otherwise `compile` picks between compiling the code and
/// registering it as finished JavaScript. The remaining keys (`target`,
/// `once`, `hash`, `attrs`) are read as script options.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptFixture {
    pub code: String,
    #[serde(default)]
    pub block: bool,
    #[serde(default)]
    pub compile: bool,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl PageFixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid fixture {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Slug from the command line, then the fixture, then the first view.
    pub fn boot_slug(&self, requested: Option<&str>) -> String {
        requested
            .or(self.slug.as_deref())
            .or_else(|| self.views.first().map(|v| v.slug.as_str()))
            .unwrap_or_default()
            .to_string()
    }

    /// Render every view into the session's page, in fixture order.
    pub fn render_into(&self, session: &mut PageSession) -> Result<()> {
        for view in &self.views {
            session
                .render_view(&view.slug, view.name.as_deref(), |s| view.render(s))
                .with_context(|| format!("failed to render view `{}`", view.slug))?;
        }
        Ok(())
    }
}

impl ViewFixture {
    fn render(&self, s: &mut RenderScope<'_>) -> Result<(), RenderError> {
        for entry in &self.state {
            if entry.global {
                s.global_state(entry.key.as_str(), entry.value.clone());
            } else {
                s.state(entry.key.as_str(), entry.value.clone());
            }
        }

        for action in &self.actions {
            s.action(action.name.as_str(), action.arity, |_| action.source.clone())?;
        }

        s.write_raw(&self.html);

        for script in &self.scripts {
            let options = ScriptOptions::from_json(&Value::Object(script.options.clone()));
            if script.block {
                s.script(options, |s| {
                    s.write_raw(&script.code);
                    Ok(())
                })?;
            } else if script.compile {
                s.add_php(&script.code, &options)?;
            } else {
                s.add_js(&script.code, &options);
            }
        }
        Ok(())
    }
}
