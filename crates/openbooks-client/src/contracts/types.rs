use serde::Serialize;

use crate::ClientError;
use crate::calendar::Period;
use crate::pipeline::select::SelectionMode;
use crate::report::ReportType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub fiscal_year: i32,
    pub fiscal_month: u32,
    pub report_date: String,
}

impl From<Period> for PeriodSummary {
    fn from(period: Period) -> Self {
        Self {
            year: period.year(),
            month: period.month(),
            month_name: period.month_name().to_string(),
            fiscal_year: period.fiscal_year(),
            fiscal_month: period.fiscal_month(),
            report_date: period.report_date(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    pub code: String,
    pub message: String,
}

impl From<&ClientError> for ErrorSummary {
    fn from(error: &ClientError) -> Self {
        Self {
            code: error.code.clone(),
            message: error.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Published,
    DryRun,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub report_type: ReportType,
    pub key: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodSummary>,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_created: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_updated: Option<i64>,
    pub identifier_collisions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSummary>,
}

impl FileOutcome {
    pub fn failed(report_type: ReportType, key: &str, error: &ClientError) -> Self {
        Self {
            report_type,
            key: key.to_string(),
            status: FileStatus::Failed,
            dataset_id: None,
            department: None,
            period: None,
            records: 0,
            rows_created: None,
            rows_updated: None,
            identifier_collisions: 0,
            error: Some(ErrorSummary::from(error)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishSummary {
    pub files_listed: usize,
    pub files_selected: usize,
    pub published: usize,
    pub dry_run: usize,
    pub skipped: usize,
    pub failed: usize,
    pub records_submitted: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishRunData {
    pub run_id: String,
    pub dry_run: bool,
    pub mode: SelectionMode,
    pub target: PeriodSummary,
    pub window: Vec<PeriodSummary>,
    pub summary: PublishSummary,
    pub files: Vec<FileOutcome>,
}

impl PublishRunData {
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub department: String,
    pub year: i32,
    pub month: u32,
    pub fiscal_year: i32,
    pub date: String,
    pub expenses_key: String,
    pub revenue_key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TasksData {
    pub target: PeriodSummary,
    pub departments: Vec<String>,
    pub tasks: Vec<TaskSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestStatus {
    Stored,
    Empty,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestOutcome {
    pub report_type: ReportType,
    pub department: String,
    pub date: String,
    pub key: String,
    pub status: HarvestStatus,
    pub rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSummary>,
}
