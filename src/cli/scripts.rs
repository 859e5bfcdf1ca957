//! `palm scripts`: dump the deduplicated scripts of a fixture.

use anyhow::Result;
use serde_json::json;

use palm::config::PalmConfig;

use super::PageArgs;
use super::assemble::render_page;

pub fn run(args: &PageArgs, config: &PalmConfig) -> Result<()> {
    let (_, _, ctx) = render_page(args, config)?;
    let dump = json!({
        "head": ctx.head_scripts,
        "body": ctx.body_scripts,
    });
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}
