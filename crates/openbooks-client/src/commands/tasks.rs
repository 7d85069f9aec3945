use chrono::NaiveDate;

use crate::ClientResult;
use crate::calendar::resolve_period;
use crate::config::PipelineConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{PeriodSummary, TaskSummary, TasksData};
use crate::harvest::build_tasks;
use crate::report::ReportType;

#[derive(Debug, Clone)]
pub struct TasksOptions {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub today: NaiveDate,
}

pub fn run(config: &PipelineConfig, options: &TasksOptions) -> ClientResult<SuccessEnvelope> {
    let target = resolve_period(options.year, options.month, options.today)?;
    let tasks = build_tasks(target, &config.departments)
        .into_iter()
        .map(|task| TaskSummary {
            expenses_key: task.source_key(ReportType::Expenses),
            revenue_key: task.source_key(ReportType::Revenue),
            department: task.department,
            year: task.year,
            month: task.month,
            fiscal_year: task.fiscal_year,
            date: task.date,
        })
        .collect();

    success(
        "tasks",
        TasksData {
            target: PeriodSummary::from(target),
            departments: config.departments.clone(),
            tasks,
        },
    )
}
