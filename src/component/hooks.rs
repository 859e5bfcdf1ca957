//! Attach component-identifying hooks to rendered HTML.
//!
//! The client finds hydration roots by attribute, the same way SSR markers
//! tag interactive islands.

use crate::utils::html::{escape_attr, first_start_tag};

/// Tag the first element of `html` with `attr="id"`.
///
/// Output without any element is wrapped in a `display:contents` div so
/// the hook has somewhere to live.
pub fn attach(html: &str, attr: &str, id: &str) -> String {
    let hook = format!(r#" {}="{}""#, attr, escape_attr(id));

    match first_start_tag(html) {
        Some(at) => {
            let mut out = String::with_capacity(html.len() + hook.len());
            out.push_str(&html[..at]);
            out.push_str(&hook);
            out.push_str(&html[at..]);
            out
        }
        None => format!(r#"<div{hook} style="display:contents">{html}</div>"#),
    }
}
