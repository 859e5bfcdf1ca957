//! `palm assemble`: render a fixture into a complete HTML document.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use palm::compiler::PassthroughCompiler;
use palm::config::PalmConfig;
use palm::log;
use palm::page::{Page, PageContext};
use palm::session::PageSession;
use palm::utils::html::escape;

use super::PageArgs;
use super::fixture::PageFixture;

/// Render the fixture named by `args` and return the page context.
pub fn render_page(args: &PageArgs, config: &PalmConfig) -> Result<(PageFixture, PageSession, PageContext)> {
    let fixture = PageFixture::load(&args.fixture)?;
    let mut session = PageSession::from_config(PassthroughCompiler, &apply_overrides(args, config));
    fixture.render_into(&mut session)?;

    let slug = fixture.boot_slug(args.slug.as_deref());
    if session.page().view(&slug).is_none() {
        log!("page"; "no view with slug `{}`, nothing boots", slug);
    }
    let ctx = session.finish(&slug);
    Ok((fixture, session, ctx))
}

/// `--minify` and `--no-cache` win over `[scripts]`.
fn apply_overrides(args: &PageArgs, config: &PalmConfig) -> PalmConfig {
    let mut config = config.clone();
    if args.minify {
        config.scripts.minify = true;
    }
    if args.no_cache {
        config.scripts.cache = false;
    }
    config
}

pub fn run(args: &PageArgs, output: Option<&Path>, config: &PalmConfig) -> Result<()> {
    let (fixture, session, ctx) = render_page(args, config)?;
    let html = document(fixture.title.as_deref(), session.page(), &ctx, &config.state.global_var);

    match output {
        Some(path) => {
            fs::write(path, &html).with_context(|| format!("failed to write {}", path.display()))?;
            log!(
                "page";
                "{} view(s), {} head + {} body script(s) -> {}",
                session.page().views().len(),
                ctx.head_scripts.len(),
                ctx.body_scripts.len(),
                path.display()
            );
        }
        None => print!("{html}"),
    }
    Ok(())
}

/// Wrap the rendered views in a full document.
pub fn document(title: Option<&str>, page: &Page, ctx: &PageContext, global_var: &str) -> String {
    let mut html = String::from("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    if let Some(title) = title {
        html.push_str(&format!("<title>{}</title>\n", escape(title)));
    }
    html.push_str(&ctx.state_script(global_var));
    html.push_str(&ctx.render_head());
    html.push_str("</head>\n<body>\n");
    for view in page.views() {
        html.push_str(&view.html);
        html.push('\n');
    }
    html.push_str(&ctx.render_body());
    html.push_str("</body>\n</html>\n");
    html
}
