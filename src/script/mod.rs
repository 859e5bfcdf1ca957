//! Script capture, registration and tag rendering.
//!
//! ```text
//! ScriptBlock (capture) ──► ScriptRegistry (compile, hash, dedup) ──► flush ──► render_scripts
//! ```

mod block;
mod entry;
mod registry;
mod tag;

pub use block::{CapturedScript, ScriptBlock};
pub use entry::{AttrValue, Attrs, ScriptEntry, ScriptOptions, ScriptTarget, normalize_attrs};
pub use registry::ScriptRegistry;
pub use tag::{HASH_ATTR, ONCE_ATTR, render_script, render_scripts};
