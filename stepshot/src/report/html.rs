use super::ReportRenderer;
use crate::{Result, Session, Step};
use chrono::Local;
use std::{fmt::Write as _, fs, path::PathBuf};

/// Dark theme by default; flip to get the light variant.
const HTML_THEME_DARK: bool = true;

const CSS_DARK: &str = "    :root { --bg:#111; --fg:#eaeaea; --muted:#9aa0a6; --card:#1b1b1b; --accent:#7aa2ff; --border:#2a2a2a; }";
const CSS_LIGHT: &str = "    :root { --bg:#f7f7f9; --fg:#1a1a1a; --muted:#616161; --card:#ffffff; --accent:#2a66ff; --border:#e6e6e6; }";

/// Hypertext renderer: one themed, self-contained `report.html` with a
/// navigable index, one card per step, and a generation footer.
///
/// Byte-deterministic except the generated-at footer field. All
/// user-derived text is escaped.
pub struct HtmlRenderer;

impl ReportRenderer for HtmlRenderer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn render(&self, session: &Session, steps: &[Step]) -> Result<PathBuf> {
        let css = if HTML_THEME_DARK { CSS_DARK } else { CSS_LIGHT };
        let run_id = escape(session.run_id());

        let mut out = String::new();
        let _ = write!(
            out,
            r#"<!doctype html>
<html lang="en"><head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>Action Report - {run_id}</title>
<style>
{css}
*{{box-sizing:border-box}}
body{{margin:0;background:var(--bg);color:var(--fg);font:16px/1.5 system-ui,Segoe UI,Roboto,Arial}}
.container{{max-width:1120px;margin:40px auto;padding:0 20px}}
h1{{font-size:28px;margin:0 0 8px}}
.subtitle{{color:var(--muted);margin-bottom:24px}}
.index{{display:grid;grid-template-columns:repeat(auto-fill,minmax(220px,1fr));gap:12px;margin:16px 0 28px}}
.badge{{display:inline-block;padding:2px 8px;background:var(--accent);color:#fff;border-radius:999px;font-size:12px;margin-left:8px}}
.card{{background:var(--card);border:1px solid var(--border);border-radius:16px;padding:16px;margin:14px 0;box-shadow:0 2px 8px rgba(0,0,0,.15)}}
.card h2{{margin:0 0 6px;font-size:20px}}
.meta{{color:var(--muted);font-size:13px;margin-bottom:10px}}
.imgwrap{{margin-top:10px;border-radius:12px;overflow:hidden;border:1px solid var(--border)}}
.imgwrap img{{width:100%;display:block}}
.hr{{height:1px;background:var(--border);margin:28px 0}}
.toplink{{font-size:13px;color:var(--accent);text-decoration:none}}
.kv{{display:grid;grid-template-columns:120px 1fr;gap:8px}}
.kv div:first-child{{color:var(--muted)}}
.footer{{color:var(--muted);font-size:12px;margin:32px 0}}
a{{color:var(--accent)}}
</style>
</head><body><div class="container" id="top">
<h1>Action Report <span class="badge">{run_id}</span></h1>
<div class="subtitle">Generated automatically. Press ESC to stop; F9 captures a manual screenshot.</div>
<h3>Index</h3>
<div class="index">
"#
        );

        for step in steps {
            let _ = writeln!(
                out,
                r##"<a class="toplink" href="#step-{}">Step {} - {}</a>"##,
                step.index,
                step.index,
                escape(&step.timestamp)
            );
        }
        out.push_str("</div><div class='hr'></div>\n");

        for step in steps {
            let _ = writeln!(out, r#"<div class="card" id="step-{}">"#, step.index);
            let _ = writeln!(out, "<h2>Step {}</h2>", step.index);
            let _ = writeln!(out, r#"<div class="meta">{}</div>"#, escape(&step.timestamp));
            out.push_str("<div class=\"kv\">\n");
            if !step.window_title.is_empty() {
                let _ = writeln!(
                    out,
                    "<div>Window</div><div>{}</div>",
                    escape(&step.window_title)
                );
            }
            if !step.app_name.is_empty() {
                let _ = writeln!(
                    out,
                    "<div>Application</div><div><code>{}</code></div>",
                    escape(&step.app_name)
                );
            }
            match step.position {
                Some(position) if step.action.is_click() => {
                    let _ = writeln!(
                        out,
                        "<div>Action</div><div>{} at {}</div>",
                        escape(&step.action.to_string()),
                        position
                    );
                }
                _ => {
                    let _ = writeln!(
                        out,
                        "<div>Action</div><div>{}</div>",
                        escape(&step.action.to_string())
                    );
                }
            }
            out.push_str("<div>Observation</div><div><em>fill in here</em></div>\n");
            out.push_str("</div>\n");
            let _ = writeln!(
                out,
                r#"<div class="imgwrap"><img src="{}" alt="Step {}"/></div>"#,
                escape(&step.marked_image_ref),
                step.index
            );
            let _ = writeln!(
                out,
                r##"<div style="margin-top:8px"><a class="toplink" href="#top">back to top</a></div>"##
            );
            out.push_str("</div>\n");
        }

        let _ = write!(
            out,
            r#"<div class="footer">Report generated at {} - {} step(s).</div>
</div></body></html>
"#,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            steps.len()
        );

        let path = session.base_dir().join("report.html");
        fs::write(&path, out)?;
        Ok(path)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
