//! Report rendering for pipeline results.
//!
//! Renderers accept any [`PipelineResult`](crate::pipeline::PipelineResult)
//! and emit one section per top-level key.

mod html;
mod markdown;

pub use html::{render_html, write_html_report, DEFAULT_HTML_REPORT};
pub use markdown::{render_markdown, write_markdown_report, DEFAULT_MARKDOWN_REPORT};

use crate::core::Record;
use crate::errors::PipelineError;
use handlebars::Handlebars;
use serde_json::{json, Value};
use std::path::Path;

/// How template variables are written into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    Html,
    Raw,
}

/// Renders an inline handlebars template against `data`.
fn render_template(template: &str, data: &Value, escape: Escape) -> Result<String, PipelineError> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    if escape == Escape::Raw {
        registry.register_escape_fn(handlebars::no_escape);
    }
    registry
        .render_template(template, data)
        .map_err(|err| PipelineError::Render(Box::new(err)))
}

/// One `{title, body}` entry per stage output, body pretty-printed.
fn stage_sections(outputs: &Record) -> Result<Vec<Value>, PipelineError> {
    outputs
        .iter()
        .map(|(key, value)| {
            Ok(json!({
                "title": title_case(key),
                "body": serde_json::to_string_pretty(value)?,
            }))
        })
        .collect()
}

/// `"simulation_result"` -> `"Simulation Result"`.
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_report(path: &Path, contents: &str) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), "Report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template_escaping() {
        let data = serde_json::json!({"name": "<b>&</b>"});
        assert_eq!(
            render_template("{{name}}", &data, Escape::Html).unwrap(),
            "&lt;b&gt;&amp;&lt;/b&gt;"
        );
        assert_eq!(render_template("{{name}}", &data, Escape::Raw).unwrap(), "<b>&</b>");
    }

    #[test]
    fn test_render_template_missing_field() {
        let err = render_template("{{absent}}", &serde_json::json!({}), Escape::Html).unwrap_err();
        assert!(matches!(err, PipelineError::Render(_)));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("vulnerabilities"), "Vulnerabilities");
        assert_eq!(title_case("simulation_result"), "Simulation Result");
        assert_eq!(title_case("a__b"), "A B");
        assert_eq!(title_case(""), "");
    }
}
