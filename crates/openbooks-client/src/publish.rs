use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SocrataSettings;
use crate::record::CanonicalRecord;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertReceipt {
    #[serde(rename = "Rows Created", default)]
    pub rows_created: Option<i64>,
    #[serde(rename = "Rows Updated", default)]
    pub rows_updated: Option<i64>,
    #[serde(rename = "Rows Deleted", default)]
    pub rows_deleted: Option<i64>,
    #[serde(rename = "Errors", default)]
    pub errors: Option<i64>,
}

/// Upserts keyed by `row_identifier`.
pub trait PublishTarget {
    fn upsert(&self, dataset_id: &str, records: &[CanonicalRecord]) -> ClientResult<UpsertReceipt>;
}

pub struct SocrataPublisher {
    client: Client,
    settings: SocrataSettings,
}

impl SocrataPublisher {
    pub fn new(settings: SocrataSettings) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|error| ClientError::internal_http_client(&error.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn upsert_url(&self, dataset_id: &str) -> String {
        format!("{}/resource/{dataset_id}.json", self.settings.base_url)
    }
}

impl PublishTarget for SocrataPublisher {
    fn upsert(&self, dataset_id: &str, records: &[CanonicalRecord]) -> ClientResult<UpsertReceipt> {
        let url = self.upsert_url(dataset_id);
        debug!(%url, records = records.len(), "sending upsert");

        let mut request = self
            .client
            .post(&url)
            .basic_auth(&self.settings.username, Some(&self.settings.password))
            .json(records);
        if let Some(token) = self.settings.app_token.as_deref() {
            request = request.header("X-App-Token", token);
        }

        let response = request
            .send()
            .map_err(|error| ClientError::publish_failed(dataset_id, &error.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|error| ClientError::publish_failed(dataset_id, &error.to_string()))?;

        if !status.is_success() {
            return Err(ClientError::publish_failed(
                dataset_id,
                &format!("HTTP {status}: {}", body.trim()),
            ));
        }

        let receipt = parse_receipt(&body);
        check_receipt(dataset_id, &receipt)?;
        Ok(receipt)
    }
}

// A 2xx body that is not a receipt carries no counters.
pub fn parse_receipt(body: &str) -> UpsertReceipt {
    serde_json::from_str::<UpsertReceipt>(body).unwrap_or_default()
}

pub fn check_receipt(dataset_id: &str, receipt: &UpsertReceipt) -> ClientResult<()> {
    match receipt.errors {
        Some(count) if count > 0 => Err(ClientError::publish_failed(
            dataset_id,
            &format!("publish target rejected {count} rows"),
        )),
        _ => Ok(()),
    }
}
