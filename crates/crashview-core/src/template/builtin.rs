//! Built-in page templates.

use crate::BoxFuture;
use crate::escape::escape_html;

use super::{RenderError, TemplateContext, TemplateRenderer};

const PAGE_STYLES: &str = r#"
    body { margin: 0; padding: 32px; background: #0f1320; color: #e4e4e7;
           font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; }
    .error-container { max-width: 1200px; margin: 0 auto; }
    h1 { margin: 0 0 4px 0; color: #f472b6; font-size: 1.1em; letter-spacing: .04em; }
    .error-message { font-size: 1.5em; margin: 0 0 16px 0; }
    .request { color: #94a3b8; font-family: monospace; margin-bottom: 24px; }
    .location { color: #94a3b8; font-family: monospace; margin: 0 0 8px 0; }
    .crashview-code { padding: 16px 0; border-radius: 8px; overflow-x: auto; line-height: 1.5; }
    .crashview-code .line { display: inline-block; width: 100%; padding: 0 16px; box-sizing: border-box; }
    .crashview-code .highlighted-line { display: inline-block; width: 100%; }
    .frames { list-style: none; padding: 0; font-family: monospace; }
    .frames li { padding: 4px 0; border-bottom: 1px solid #1e293b; }
    .frames .method { color: #c4b5fd; }
    .frames .file { color: #94a3b8; }
    details pre { white-space: pre-wrap; color: #94a3b8; }
"#;

/// Self-contained development page: message, highlighted source, frame
/// list and the raw stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplate;

impl BuiltinTemplate {
    pub fn render_page(&self, ctx: &TemplateContext) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("  <meta charset=\"utf-8\">\n");
        html.push_str(&format!(
            "  <title>{}: {}</title>\n",
            escape_html(&ctx.name),
            escape_html(&ctx.message)
        ));
        html.push_str("  <style>");
        html.push_str(PAGE_STYLES);
        html.push_str("  </style>\n</head>\n<body>\n");
        html.push_str("  <div class=\"error-container\">\n");

        html.push_str(&format!(
            "    <h1>{} &middot; {}</h1>\n",
            escape_html(&ctx.name),
            ctx.status
        ));
        html.push_str(&format!(
            "    <p class=\"error-message\">{}</p>\n",
            escape_html(&ctx.message)
        ));

        if let Some(request) = &ctx.request {
            html.push_str(&format!(
                "    <div class=\"request\">{} {}</div>\n",
                escape_html(&request.method),
                escape_html(&request.uri)
            ));
        }

        if let (Some(file), Some(line)) = (&ctx.file, ctx.line) {
            html.push_str(&format!(
                "    <p class=\"location\">{}:{}</p>\n",
                escape_html(file),
                line
            ));
        }

        // Already-rendered markup from the highlighter.
        html.push_str("    ");
        html.push_str(&ctx.code);
        html.push('\n');

        html.push_str("    <h2>Stack</h2>\n    <ul class=\"frames\">\n");
        for frame in &ctx.stack.lines {
            let method = frame.method.as_deref().unwrap_or("<anonymous>");
            html.push_str(&format!(
                "      <li><span class=\"method\">{}</span> <span class=\"file\">{}</span></li>\n",
                escape_html(method),
                escape_html(&frame.location())
            ));
        }
        html.push_str("    </ul>\n");

        html.push_str("    <details>\n      <summary>Raw stack</summary>\n      <pre>");
        html.push_str(&escape_html(&ctx.stack.raw));
        html.push_str("</pre>\n    </details>\n");

        html.push_str("  </div>\n</body>\n</html>\n");
        html
    }
}

impl TemplateRenderer for BuiltinTemplate {
    fn name(&self) -> &str {
        "builtin"
    }

    fn render<'a>(&'a self, context: &'a TemplateContext) -> BoxFuture<'a, Result<String, RenderError>> {
        Box::pin(async move { Ok(self.render_page(context)) })
    }
}

/// Generic page served in production. Shows only the status and the
/// error class, never source or stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductionTemplate;

impl ProductionTemplate {
    pub fn render_page(&self, status: u16, name: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{status}</title>\n</head>\n<body>\n  <h1>{status}</h1>\n  <p>{}</p>\n</body>\n</html>\n",
            escape_html(name)
        )
    }
}

impl TemplateRenderer for ProductionTemplate {
    fn name(&self) -> &str {
        "production"
    }

    fn render<'a>(&'a self, context: &'a TemplateContext) -> BoxFuture<'a, Result<String, RenderError>> {
        Box::pin(async move { Ok(self.render_page(context.status, &context.name)) })
    }
}
