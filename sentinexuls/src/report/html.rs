//! Static HTML report.

use super::{render_template, stage_sections, write_report, Escape};
use crate::errors::PipelineError;
use crate::pipeline::PipelineResult;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Default location of the HTML report.
pub const DEFAULT_HTML_REPORT: &str = "outputs/generated_report.html";

const STYLE: &str = r"
body { font-family: 'Segoe UI', Tahoma, sans-serif; margin: 0; padding: 40px; background: #eef1f7; }
.container { max-width: 1200px; margin: 0 auto; background: white; border-radius: 12px; overflow: hidden; }
.header { background: #004d99; color: white; padding: 30px 40px; text-align: center; }
.header h1 { margin: 0; font-weight: 300; }
.content { padding: 40px; }
.section { margin-bottom: 30px; padding: 25px; background: #f8f9fa; border-radius: 8px; border-left: 5px solid #3399ff; }
.section h2 { color: #004d99; margin-top: 0; }
.error-section { border-left-color: #e53e3e; background: #fed7d7; }
.error-section h2 { color: #c53030; }
pre { background: #2d3748; color: #e2e8f0; padding: 20px; margin: 0; overflow-x: auto; border-radius: 6px; }
.stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 30px; }
.stat-card { padding: 20px; border-radius: 8px; text-align: center; border: 1px solid #e2e8f0; }
.stat-number { font-size: 2em; font-weight: bold; color: #3399ff; }
.stat-label { color: #718096; font-size: 0.9em; }
.footer { text-align: center; padding: 20px; color: #718096; border-top: 1px solid #e2e8f0; }
";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>SentiNexuls Agent Report</title>
<style>{{{style}}}</style>
</head>
<body>
<div class="container">
<div class="header">
<h1>SentiNexuls Intelligence Brief</h1>
<p>Generated: {{generated_at}}</p>
</div>
<div class="content">
{{#if error}}
<div class="section error-section">
<h2>Pipeline Error</h2>
<pre>{{error}}</pre>
</div>
{{else}}
<div class="stats">
<div class="stat-card"><div class="stat-number">{{agents_executed}}</div><div class="stat-label">Agents Executed</div></div>
<div class="stat-card"><div class="stat-number">OK</div><div class="stat-label">Pipeline Status</div></div>
<div class="stat-card"><div class="stat-number">{{data_points}}</div><div class="stat-label">Data Points</div></div>
</div>
{{#each sections}}
<div class="section">
<h2>{{title}} Agent</h2>
<pre>{{body}}</pre>
</div>
{{/each}}
{{/if}}
</div>
<div class="footer"><p>SentiNexuls - Advanced Threat Detection &amp; Response Platform</p></div>
</div>
</body>
</html>
"#;

/// Renders a result as a standalone HTML document.
///
/// A completed run gets a statistics block and one section per stage
/// output; a failed run gets a single error section. All values are
/// HTML-escaped.
pub fn render_html(result: &PipelineResult, generated_at: &str) -> Result<String, PipelineError> {
    let data = match result {
        PipelineResult::Completed(outputs) => {
            let sections = stage_sections(outputs)?;
            json!({
                "style": STYLE,
                "generated_at": generated_at,
                "error": null,
                "agents_executed": outputs.len(),
                "data_points": serde_json::to_string(outputs)?.len(),
                "sections": sections,
            })
        }
        PipelineResult::Failed { error } => json!({
            "style": STYLE,
            "generated_at": generated_at,
            "error": serde_json::to_string_pretty(error)?,
        }),
    };

    render_template(TEMPLATE, &data, Escape::Html)
}

/// Renders and writes the HTML report, creating parent directories.
pub fn write_html_report(
    result: &PipelineResult,
    path: impl AsRef<Path>,
    generated_at: &str,
) -> Result<PathBuf, PipelineError> {
    let path = path.as_ref();
    write_report(path, &render_html(result, generated_at)?)?;
    Ok(path.to_path_buf())
}
