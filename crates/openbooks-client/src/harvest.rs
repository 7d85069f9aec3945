use tracing::{info, warn};

use crate::ClientResult;
use crate::calendar::Period;
use crate::contracts::types::{ErrorSummary, HarvestOutcome, HarvestStatus};
use crate::pipeline::parse::parse_report;
use crate::report::ReportType;
use crate::storage::ObjectStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTask {
    pub year: i32,
    pub month: u32,
    pub fiscal_year: i32,
    pub date: String,
    pub department: String,
}

impl ReportTask {
    pub fn new(period: Period, department: &str) -> Self {
        Self {
            year: period.year(),
            month: period.month(),
            fiscal_year: period.fiscal_year(),
            date: period.report_date(),
            department: department.to_string(),
        }
    }

    pub fn source_key(&self, report: ReportType) -> String {
        format!("{}{}_{}.csv", report.prefix(), self.date, self.department)
    }
}

pub fn build_tasks(target: Period, departments: &[String]) -> Vec<ReportTask> {
    let months = [target.previous(), target];
    departments
        .iter()
        .flat_map(|department| {
            months
                .iter()
                .map(move |period| ReportTask::new(*period, department))
        })
        .collect()
}

/// Produces report CSVs. The reporting service protocol lives behind this seam.
pub trait ReportEngine {
    fn fetch_report(&self, report: ReportType, task: &ReportTask) -> ClientResult<String>;
}

pub fn harvest(
    engine: &dyn ReportEngine,
    store: &dyn ObjectStore,
    tasks: &[ReportTask],
) -> Vec<HarvestOutcome> {
    let mut outcomes = Vec::with_capacity(tasks.len() * ReportType::ALL.len());
    for task in tasks {
        for report in ReportType::ALL {
            outcomes.push(harvest_one(engine, store, report, task));
        }
    }
    outcomes
}

fn harvest_one(
    engine: &dyn ReportEngine,
    store: &dyn ObjectStore,
    report: ReportType,
    task: &ReportTask,
) -> HarvestOutcome {
    let key = task.source_key(report);
    let mut outcome = HarvestOutcome {
        report_type: report,
        department: task.department.clone(),
        date: task.date.clone(),
        key: key.clone(),
        status: HarvestStatus::Failed,
        rows: 0,
        error: None,
    };

    let stored = engine
        .fetch_report(report, task)
        .and_then(|csv| {
            let rows = parse_report(&key, csv.as_bytes())?.len();
            if rows > 0 {
                store.put(&key, csv.as_bytes())?;
            }
            Ok(rows)
        });

    match stored {
        Ok(0) => {
            info!(key = %key, "report came back empty; not stored");
            outcome.status = HarvestStatus::Empty;
        }
        Ok(rows) => {
            info!(key = %key, rows, "stored report");
            outcome.status = HarvestStatus::Stored;
            outcome.rows = rows;
        }
        Err(error) => {
            warn!(key = %key, error = %error, "harvest failed");
            outcome.error = Some(ErrorSummary::from(&error));
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::{ReportTask, build_tasks};
    use crate::calendar::Period;
    use crate::pipeline::select::SourceDescriptor;
    use crate::report::ReportType;

    fn period(year: i32, month: u32) -> Period {
        let parsed = Period::new(year, month);
        assert!(parsed.is_ok());
        parsed.unwrap_or_else(|_| Period::from_date(chrono::NaiveDate::MIN))
    }

    #[test]
    fn tasks_cover_previous_then_target_month_per_department() {
        let departments = vec!["2400".to_string(), "6200".to_string()];
        let tasks = build_tasks(period(2024, 1), &departments);
        let summary = tasks
            .iter()
            .map(|task| (task.department.as_str(), task.date.as_str(), task.fiscal_year))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                ("2400", "2023-12-31", 2024),
                ("2400", "2024-01-31", 2024),
                ("6200", "2023-12-31", 2024),
                ("6200", "2024-01-31", 2024),
            ]
        );
    }

    #[test]
    fn source_key_matches_the_stored_object_layout() {
        let task = ReportTask::new(period(2024, 2), "2400");
        assert_eq!(
            task.source_key(ReportType::Expenses),
            "expenses/2024-02-29_2400.csv"
        );
        assert_eq!(task.source_key(ReportType::Revenue), "revenue/2024-02-29_2400.csv");
    }

    #[test]
    fn no_departments_means_no_tasks() {
        assert!(build_tasks(period(2024, 3), &[]).is_empty());
    }

    #[test]
    fn harvested_keys_parse_back_into_descriptors() {
        let departments = vec!["0042".to_string()];
        for task in build_tasks(period(2024, 1), &departments) {
            for report in ReportType::ALL {
                let parsed = SourceDescriptor::parse(&task.source_key(report));
                assert!(parsed.is_ok());
                if let Ok(descriptor) = parsed {
                    assert_eq!(descriptor.report_type, report);
                    assert_eq!(descriptor.department, "0042");
                    assert_eq!(descriptor.period.year(), task.year);
                    assert_eq!(descriptor.period.month(), task.month);
                    assert_eq!(descriptor.period.fiscal_year(), task.fiscal_year);
                }
            }
        }
    }
}
