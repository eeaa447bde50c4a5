//! Markdown report, as written by the `run` command.

use super::{render_template, stage_sections, write_report, Escape};
use crate::errors::PipelineError;
use crate::pipeline::PipelineResult;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Default location of the markdown report.
pub const DEFAULT_MARKDOWN_REPORT: &str = "outputs/generated_report.md";

// Block tags share their line with text so handlebars keeps the blank lines.
const TEMPLATE: &str = concat!(
    "# SentiNexuls Agent Report\n\n",
    "Generated at: {{generated_at}}\n\n",
    "{{#if error}}## Pipeline Error\n```\n{{error}}\n```\n\n",
    "{{else}}{{#each sections}}## {{title}} Agent Results\n```json\n{{body}}\n```\n\n",
    "{{/each}}{{/if}}",
);

/// Renders a result as markdown with one fenced JSON block per stage.
pub fn render_markdown(
    result: &PipelineResult,
    generated_at: &str,
) -> Result<String, PipelineError> {
    let data = match result {
        PipelineResult::Completed(outputs) => {
            let sections = stage_sections(outputs)?;
            json!({"generated_at": generated_at, "error": null, "sections": sections})
        }
        PipelineResult::Failed { error } => json!({"generated_at": generated_at, "error": error}),
    };

    render_template(TEMPLATE, &data, Escape::Raw)
}

/// Renders and writes the markdown report, creating parent directories.
pub fn write_markdown_report(
    result: &PipelineResult,
    path: impl AsRef<Path>,
    generated_at: &str,
) -> Result<PathBuf, PipelineError> {
    let path = path.as_ref();
    write_report(path, &render_markdown(result, generated_at)?)?;
    Ok(path.to_path_buf())
}
