use chrono::NaiveDate;
use ulid::Ulid;

use crate::calendar::resolve_period;
use crate::config::PipelineConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::pipeline;
use crate::publish::SocrataPublisher;
use crate::storage::{FsObjectStore, ObjectStore};
use crate::{ClientError, ClientResult};

pub use crate::pipeline::{PublishRequest, Publisher, SelectionMode};

#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub replace: bool,
    pub dry_run: bool,
    pub today: NaiveDate,
}

pub fn run(config: &PipelineConfig, options: &PublishOptions) -> ClientResult<SuccessEnvelope> {
    let request = request_for(options)?;
    let store = FsObjectStore::new(config.storage_root.clone());

    if options.dry_run {
        return run_with(&store, None, &request);
    }

    let datasets = config.require_datasets()?;
    let target = SocrataPublisher::new(config.require_socrata()?)?;
    run_with(
        &store,
        Some(Publisher {
            target: &target,
            datasets: &datasets,
        }),
        &request,
    )
}

pub fn request_for(options: &PublishOptions) -> ClientResult<PublishRequest> {
    Ok(PublishRequest {
        run_id: format!("run_{}", Ulid::new()),
        target: resolve_period(options.year, options.month, options.today)?,
        mode: SelectionMode::from_replace_flag(options.replace),
    })
}

/// Any failed file turns the run into a `publish_incomplete` error that
/// still carries the full run report.
pub fn run_with(
    store: &dyn ObjectStore,
    publisher: Option<Publisher<'_>>,
    request: &PublishRequest,
) -> ClientResult<SuccessEnvelope> {
    let data = pipeline::execute(store, publisher, request)?;
    if data.has_failures() {
        let report = serde_json::to_value(&data)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
        return Err(ClientError::publish_incomplete(
            data.summary.failed,
            data.files.len(),
            report,
        ));
    }
    success("publish", data)
}
