//! One-shot command-line runs.

use crate::api::{vault_settings, AppState};
use anyhow::{Context, Result};
use sentinexuls::context::ConfigProvider;
use sentinexuls::core::{record_from, Record};
use sentinexuls::pipeline::PipelineResult;
use sentinexuls::report::{write_html_report, write_markdown_report};
use sentinexuls::utils::iso_timestamp;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Input file read by `run` when none is given.
pub const DEFAULT_INPUT: &str = "data/example_input.json";

const MAIN_SOURCE: &str = "Main";

/// Outcome of [`run_once`].
#[derive(Debug)]
pub struct RunSummary {
    /// The pipeline result.
    pub result: PipelineResult,
    /// Written markdown report.
    pub markdown: PathBuf,
    /// Written HTML report.
    pub html: PathBuf,
}

/// Input used when the input file is missing, unreadable or empty.
#[must_use]
pub fn fallback_input() -> Record {
    record_from(json!({"default": true, "message": "No input file found"}))
}

/// Reads a JSON object from `path`. Any failure yields an empty record.
pub fn load_input(state: &AppState, path: &Path) -> Record {
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()));

    match loaded {
        Ok(value) => {
            let record = record_from(value);
            state.logger.log_event(
                MAIN_SOURCE,
                &format!("Input data loaded from {}", path.display()),
                Some(&json!({"keys": record.len()})),
                false,
            );
            record
        }
        Err(error) => {
            state.logger.log_event(
                MAIN_SOURCE,
                &format!("Failed to load input data from {}", path.display()),
                Some(&json!({"error": error})),
                false,
            );
            Record::new()
        }
    }
}

/// Runs the pipeline once and writes `generated_report.md` and
/// `generated_report.html` into `report_dir`.
pub async fn run_once(
    state: &AppState,
    input: Option<&Path>,
    report_dir: &Path,
) -> Result<RunSummary> {
    let path = input.unwrap_or_else(|| Path::new(DEFAULT_INPUT));
    let mut record = load_input(state, path);
    if record.is_empty() {
        state
            .logger
            .log_event(MAIN_SOURCE, "No input data available, using default", None, false);
        record = fallback_input();
    }

    let result = state.executor.run_pipeline(record).await;
    let generated_at = iso_timestamp();

    let markdown =
        write_markdown_report(&result, report_dir.join("generated_report.md"), &generated_at)
            .context("Failed to write markdown report")?;
    let html = write_html_report(&result, report_dir.join("generated_report.html"), &generated_at)
        .context("Failed to write HTML report")?;

    let event = if result.is_success() {
        "Pipeline completed successfully and report generated"
    } else {
        "Pipeline completed with errors"
    };
    state.logger.log_event(MAIN_SOURCE, event, None, false);

    Ok(RunSummary {
        result,
        markdown,
        html,
    })
}

/// Pretty-printed vault settings.
pub fn vault_settings_json(state: &AppState) -> Result<String> {
    serde_json::to_string_pretty(&vault_settings(&state.store.get()))
        .context("Failed to serialize vault settings")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinexuls::context::InMemoryConfigStore;
    use sentinexuls::events::CollectingEventLogger;
    use std::sync::Arc;

    fn state(logger: Arc<CollectingEventLogger>) -> AppState {
        AppState::new(Arc::new(InMemoryConfigStore::default()), logger, Some(3)).unwrap()
    }

    #[test]
    fn test_load_input_missing_file() {
        let logger = Arc::new(CollectingEventLogger::new());
        let dir = tempfile::tempdir().unwrap();
        let record = load_input(&state(logger.clone()), &dir.path().join("absent.json"));
        assert!(record.is_empty());
        assert!(logger.entries()[0].event.starts_with("Failed to load input data"));
    }

    #[test]
    fn test_load_input_object() {
        let logger = Arc::new(CollectingEventLogger::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(&path, r#"{"region": "Florida-East"}"#).unwrap();

        let record = load_input(&state(logger), &path);
        assert_eq!(record["region"], "Florida-East");
    }

    #[tokio::test]
    async fn test_run_once_falls_back_and_writes_reports() {
        let logger = Arc::new(CollectingEventLogger::new());
        let state = state(logger.clone());
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("absent.json");
        let summary = run_once(&state, Some(&missing), &dir.path().join("outputs"))
            .await
            .unwrap();

        assert!(summary.result.is_success());
        assert!(summary.markdown.exists());
        assert!(summary.html.exists());
        let intel_start = logger
            .from_source("intel")
            .into_iter()
            .next()
            .unwrap();
        assert_eq!(intel_start.data["input"]["message"], "No input file found");
    }

    #[test]
    fn test_vault_settings_json() {
        let state = state(Arc::new(CollectingEventLogger::new()));
        let text = vault_settings_json(&state).unwrap();
        assert!(text.contains("\"evolution_stage\": \"ADVANCED\""));
    }
}
