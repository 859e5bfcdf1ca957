//! `<script>` tag rendering.

use std::fmt::Write;

use super::entry::{AttrValue, ScriptEntry};
use crate::utils::html::escape_attr;

/// Marker attribute carrying the `once` flag (`"0"` / `"1"`).
pub const ONCE_ATTR: &str = "data-palm-once";

/// Marker attribute carrying the script hash.
pub const HASH_ATTR: &str = "data-palm-script";

/// Render one tag per entry, in order. Entries with blank code are skipped.
pub fn render_scripts(scripts: &[ScriptEntry]) -> String {
    let mut out = String::new();
    for entry in scripts {
        if let Some(tag) = render_script(entry) {
            out.push_str(&tag);
        }
    }
    out
}

/// `<script{ATTRS}>{CODE}</script>\n`, or `None` for blank code.
pub fn render_script(entry: &ScriptEntry) -> Option<String> {
    if entry.code.trim().is_empty() {
        return None;
    }

    let mut tag = String::from("<script");
    for (name, value) in &entry.attrs {
        match value {
            AttrValue::Flag(true) => {
                let name = escape_attr(name);
                write!(tag, r#" {name}="{name}""#).ok();
            }
            AttrValue::Flag(false) => {}
            AttrValue::Text(text) => {
                write!(tag, r#" {}="{}""#, escape_attr(name), escape_attr(text)).ok();
            }
        }
    }
    write!(tag, r#" {ONCE_ATTR}="{}""#, if entry.once { "1" } else { "0" }).ok();
    if !entry.hash.is_empty() {
        write!(tag, r#" {HASH_ATTR}="{}""#, escape_attr(&entry.hash)).ok();
    }
    writeln!(tag, ">{}</script>", entry.code).ok();

    Some(tag)
}
