pub(crate) mod identifier;
pub(crate) mod normalize;
pub(crate) mod parse;
pub(crate) mod select;

use tracing::{debug, info, warn};

use crate::ClientResult;
use crate::calendar::Period;
use crate::config::DatasetIds;
use crate::contracts::types::{FileOutcome, FileStatus, PeriodSummary, PublishRunData, PublishSummary};
use crate::publish::PublishTarget;
use crate::record::CanonicalRecord;
use crate::report::ReportType;
use crate::storage::ObjectStore;

use select::SourceDescriptor;

pub use select::SelectionMode;

/// Where normalized batches go. Absent for dry runs.
#[derive(Clone, Copy)]
pub struct Publisher<'a> {
    pub target: &'a dyn PublishTarget,
    pub datasets: &'a DatasetIds,
}

#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub run_id: String,
    pub target: Period,
    pub mode: SelectionMode,
}

#[derive(Debug, Clone)]
pub(crate) struct PreparedBatch {
    pub(crate) records: Vec<CanonicalRecord>,
    pub(crate) identifier_collisions: usize,
}

/// Listing failures abort before anything is submitted. After that, a bad
/// key, unreadable object or rejected upsert is recorded against its file
/// and the pass moves on.
pub(crate) fn execute(
    store: &dyn ObjectStore,
    publisher: Option<Publisher<'_>>,
    request: &PublishRequest,
) -> ClientResult<PublishRunData> {
    let mut listings = Vec::with_capacity(ReportType::ALL.len());
    for report in ReportType::ALL {
        listings.push((report, store.list(report.prefix())?));
    }

    let mut summary = PublishSummary::default();
    let mut files = Vec::new();

    for (report, keys) in listings {
        let selection = select::select_batches(report, &keys, request.target, request.mode);
        summary.files_listed += keys.len();
        summary.files_selected += selection.selected.len();
        debug!(
            report = report.as_str(),
            listed = keys.len(),
            selected = selection.selected.len(),
            out_of_window = selection.out_of_window,
            "selected report files"
        );

        for rejected in &selection.rejected {
            warn!(
                report = report.as_str(),
                key = %rejected.key,
                "skipping object with malformed key"
            );
            files.push(FileOutcome::failed(report, &rejected.key, &rejected.error));
        }

        for descriptor in &selection.selected {
            files.push(process_file(store, publisher, descriptor));
        }
    }

    for outcome in &files {
        match outcome.status {
            FileStatus::Published => {
                summary.published += 1;
                summary.records_submitted += outcome.records;
            }
            FileStatus::DryRun => summary.dry_run += 1,
            FileStatus::Skipped => summary.skipped += 1,
            FileStatus::Failed => summary.failed += 1,
        }
    }

    info!(
        run_id = %request.run_id,
        published = summary.published,
        failed = summary.failed,
        skipped = summary.skipped,
        records = summary.records_submitted,
        "publish run finished"
    );

    Ok(PublishRunData {
        run_id: request.run_id.clone(),
        dry_run: publisher.is_none(),
        mode: request.mode,
        target: PeriodSummary::from(request.target),
        window: request
            .mode
            .window(request.target)
            .into_iter()
            .map(PeriodSummary::from)
            .collect(),
        summary,
        files,
    })
}

pub(crate) fn prepare_batch(
    store: &dyn ObjectStore,
    descriptor: &SourceDescriptor,
) -> ClientResult<PreparedBatch> {
    let content = store.get(&descriptor.key)?;
    let rows = parse::parse_report(&descriptor.key, &content)?;
    let mut records = normalize::normalize_records(descriptor.report_type, &rows);
    for record in &mut records {
        enrich_record(record, descriptor);
    }

    let columns = descriptor.report_type.identifier_columns();
    let collisions = identifier::find_collisions(&records, columns);
    for collision in &collisions {
        warn!(
            key = %descriptor.key,
            row_identifier = %collision.row_identifier,
            first_row = collision.first_row,
            second_row = collision.second_row,
            "distinct rows share a row_identifier; the later row will overwrite the earlier"
        );
    }

    Ok(PreparedBatch {
        records,
        identifier_collisions: collisions.len(),
    })
}

pub(crate) fn enrich_record(record: &mut CanonicalRecord, descriptor: &SourceDescriptor) {
    let period = descriptor.period;
    record.insert("year", i64::from(period.year()));
    record.insert("month", i64::from(period.month()));
    record.insert("department", descriptor.department.as_str());
    record.insert("month_name", period.month_name());
    record.insert("fiscal_year", i64::from(period.fiscal_year()));
    record.insert("fiscal_month", i64::from(period.fiscal_month()));

    let row_identifier =
        identifier::row_identifier(record, descriptor.report_type.identifier_columns());
    record.insert("row_identifier", row_identifier);
}

fn process_file(
    store: &dyn ObjectStore,
    publisher: Option<Publisher<'_>>,
    descriptor: &SourceDescriptor,
) -> FileOutcome {
    let report = descriptor.report_type;
    let dataset_id = publisher.map(|sink| sink.datasets.for_report(report).to_string());
    let mut outcome = FileOutcome {
        report_type: report,
        key: descriptor.key.clone(),
        status: FileStatus::Failed,
        dataset_id: dataset_id.clone(),
        department: Some(descriptor.department.clone()),
        period: Some(PeriodSummary::from(descriptor.period)),
        records: 0,
        rows_created: None,
        rows_updated: None,
        identifier_collisions: 0,
        error: None,
    };

    let batch = match prepare_batch(store, descriptor) {
        Ok(batch) => batch,
        Err(error) => {
            warn!(key = %descriptor.key, code = %error.code, "could not prepare report file");
            outcome.error = Some((&error).into());
            return outcome;
        }
    };
    outcome.records = batch.records.len();
    outcome.identifier_collisions = batch.identifier_collisions;

    if batch.records.is_empty() {
        info!(key = %descriptor.key, "report file has no rows; nothing to publish");
        outcome.status = FileStatus::Skipped;
        return outcome;
    }

    let (Some(sink), Some(dataset_id)) = (publisher, dataset_id) else {
        info!(key = %descriptor.key, records = outcome.records, "dry run; batch not submitted");
        outcome.status = FileStatus::DryRun;
        return outcome;
    };

    match sink.target.upsert(&dataset_id, &batch.records) {
        Ok(receipt) => {
            info!(
                key = %descriptor.key,
                dataset_id = %dataset_id,
                records = outcome.records,
                rows_created = ?receipt.rows_created,
                rows_updated = ?receipt.rows_updated,
                "published report file"
            );
            outcome.status = FileStatus::Published;
            outcome.rows_created = receipt.rows_created;
            outcome.rows_updated = receipt.rows_updated;
        }
        Err(error) => {
            warn!(
                key = %descriptor.key,
                dataset_id = %dataset_id,
                error = %error,
                "upsert failed"
            );
            outcome.error = Some((&error).into());
        }
    }

    outcome
}
