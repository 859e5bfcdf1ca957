//! Palm - server-driven hydration.
//!
//! Components render to HTML on the server. While rendering they record the
//! state and actions the client needs and register the scripts they depend
//! on. Scripts are deduplicated by content hash across the whole page, so a
//! page ships each script once no matter how many components asked for it.
//!
//! ```text
//! ComponentManager::render ──► RenderResult ──► Page::push ──► Page::finish ──► PageContext
//!        │                        html                            single flush     head/body tags
//!        └─ RenderScope           payload                                          bootstrap blob
//!           (state, actions,      scripts
//!            script blocks)
//! ```

#[macro_use]
pub mod logger;

pub mod action;
pub mod compiler;
pub mod component;
pub mod config;
pub mod error;
pub mod output;
pub mod page;
pub mod script;
pub mod session;
pub mod utils;

pub use action::{ActionArgument, ExpressionReference, RecordedValue};
pub use compiler::{CompileError, ExpressionCompiler, PassthroughCompiler, SharedCompiler};
pub use component::{ComponentManager, ComponentPayload, RenderResult, RenderScope};
pub use config::PalmConfig;
pub use error::RenderError;
pub use page::{Page, PageContext, View};
pub use script::{ScriptEntry, ScriptOptions, ScriptRegistry, ScriptTarget};
pub use session::PageSession;
