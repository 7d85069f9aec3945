use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const PUBLISH_HELP_COMMAND: &str = "openbooks publish --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `openbooks {cmd} --help` for usage."),
            None => "Run `openbooks --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_period(year: i32, month: u32) -> Self {
        Self::invalid_argument_for_command(
            &format!("Period {year}-{month} is not a calendar month (year 1-9999, month 1-12)."),
            Some("publish"),
        )
        .with_data(json!({
            "year": year,
            "month": month,
        }))
    }

    pub fn config_missing(variables: &[&str]) -> Self {
        Self::new(
            "config_missing",
            &format!(
                "Required configuration is missing: {}.",
                variables.join(", ")
            ),
            vec![
                "Export the listed environment variables before running openbooks.".to_string(),
                format!("Run `{PUBLISH_HELP_COMMAND}` to review configuration."),
            ],
        )
        .with_data(json!({
            "missing": variables,
        }))
    }

    pub fn config_invalid(variable: &str, detail: &str) -> Self {
        Self::new(
            "config_invalid",
            &format!("Configuration value `{variable}` is invalid: {detail}"),
            vec![format!("Fix `{variable}` in the environment and rerun.")],
        )
        .with_data(json!({
            "variable": variable,
        }))
    }

    pub fn malformed_source_key(key: &str) -> Self {
        Self::new(
            "malformed_source_key",
            &format!(
                "Object key `{key}` does not follow `<report>/<YYYY>-<MM>-<DD>_<DEPT>.csv`."
            ),
            vec![
                "Rename or remove the object so it matches the report key layout.".to_string(),
                "Rerun `openbooks publish` once the key is fixed.".to_string(),
            ],
        )
        .with_data(json!({
            "key": key,
        }))
    }

    pub fn storage_unavailable(root: &Path, detail: &str) -> Self {
        let location = root.display().to_string();
        Self::new(
            "storage_unavailable",
            &format!("Object storage at `{location}` could not be read: {detail}"),
            vec![format!(
                "Check that `{location}` exists or set `OPENBOOKS_STORAGE_ROOT` to the report bucket."
            )],
        )
    }

    pub fn source_read_failed(key: &str, detail: &str) -> Self {
        Self::new(
            "source_read_failed",
            &format!("Could not read report `{key}`: {detail}"),
            vec!["Verify the object exists and is readable, then rerun.".to_string()],
        )
        .with_data(json!({
            "key": key,
        }))
    }

    pub fn source_write_failed(key: &str, detail: &str) -> Self {
        Self::new(
            "source_write_failed",
            &format!("Could not store report `{key}`: {detail}"),
            vec!["Verify the storage root is writable, then rerun.".to_string()],
        )
        .with_data(json!({
            "key": key,
        }))
    }

    pub fn source_parse_failed(key: &str, detail: &str) -> Self {
        Self::new(
            "source_parse_failed",
            &format!("Report `{key}` is not a readable CSV: {detail}"),
            vec![
                "Re-export the report as UTF-8 CSV with a header row.".to_string(),
                "Rerun `openbooks publish` for the affected month.".to_string(),
            ],
        )
        .with_data(json!({
            "key": key,
        }))
    }

    pub fn publish_failed(dataset_id: &str, detail: &str) -> Self {
        Self::new(
            "publish_failed",
            &format!("Upsert into dataset `{dataset_id}` failed: {detail}"),
            vec![
                "Check publish credentials and dataset permissions.".to_string(),
                "Rerun `openbooks publish`; upserts are idempotent by row_identifier.".to_string(),
            ],
        )
        .with_data(json!({
            "dataset_id": dataset_id,
        }))
    }

    pub fn report_fetch_failed(report: &str, department: &str, detail: &str) -> Self {
        Self::new(
            "report_fetch_failed",
            &format!("Fetching the {report} report for department {department} failed: {detail}"),
            vec!["Retry the harvest for the affected department.".to_string()],
        )
        .with_data(json!({
            "report": report,
            "department": department,
        }))
    }

    pub fn publish_incomplete(failed: usize, total: usize, report: Value) -> Self {
        Self::new(
            "publish_incomplete",
            &format!("{failed} of {total} report files failed to publish."),
            vec![
                "Review the failed files listed in the run report.".to_string(),
                "Fix the source objects or publish target, then rerun `openbooks publish`."
                    .to_string(),
            ],
        )
        .with_data(report)
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn internal_pattern(message: &str) -> Self {
        Self::new("internal_pattern_error", message, Vec::new())
    }

    pub fn internal_http_client(message: &str) -> Self {
        Self::new("internal_http_client_error", message, Vec::new())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
