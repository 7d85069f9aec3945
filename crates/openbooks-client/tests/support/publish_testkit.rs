use std::cell::RefCell;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread::{self, JoinHandle};

use openbooks_client::calendar::Period;
use openbooks_client::config::DatasetIds;
use openbooks_client::publish::{PublishTarget, UpsertReceipt};
use openbooks_client::record::CanonicalRecord;
use openbooks_client::{ClientError, ClientResult};
use tempfile::{Builder, TempDir};

pub const EXPENSES_DATASET: &str = "exp1-2345";
pub const REVENUE_DATASET: &str = "rev6-7890";

pub const EXPENSES_HEADER: &str = "Fund@Code,Fund@Long Name,Department@Dept,Department@Long Name,Unit@Unit Code,Unit@Long Name,Object Code Category@Code,Object Code Category@Long Name,Object Code@Code,Object Code@Long Name,Object Code - Spending Plan@Code,Object Code - Spending Plan@Long Name,Budget YTD with Period Cutoff,Proposed Budget CYE Amount FY & BFY Prompted (Phase 6),Expenses MTD with Period Cutoff,Expenses YTD with Period Cutoff,Encumbrance YTD with Period Cutoff,% Obligated";

pub const REVENUE_HEADER: &str = "Fund@Code,Fund@Long Name,Department@Dept,Department@Long Name,Unit@Unit Code,Unit@Long Name,Revenue Source Category@Code,Revenue Source Category@Long Name,Revenue Source@Code,Revenue Source@Long Name,Revenue Budget YTD with Period Cutoff,Proposed Revenue Amount CYE Prompted FY & BFY (Phase 6),Revenue MTD with Period Cutoff,Revenue YTD with Period Cutoff,Revenue ITD with Period Cutoff,Unrecognized Amount,% Unrecognized";

pub fn temp_bucket(prefix: &str) -> std::io::Result<TempDir> {
    Builder::new().prefix(prefix).tempdir()
}

pub fn write_object(root: &Path, key: &str, body: &str) {
    write_object_bytes(root, key, body.as_bytes());
}

pub fn write_object_bytes(root: &Path, key: &str, body: &[u8]) {
    let path = root.join(key);
    if let Some(parent) = path.parent() {
        let created = fs::create_dir_all(parent);
        assert!(created.is_ok());
    }
    let written = fs::write(path, body);
    assert!(written.is_ok());
}

/// One expenses row for unit/object; the unobligated column is absent from
/// the header and `% Obligated` is left blank.
pub fn expenses_csv(rows: &[(&str, &str)]) -> String {
    let mut body = format!("{EXPENSES_HEADER}\n");
    for (unit, object_code) in rows {
        body.push_str(&format!(
            "8000,General Fund,9999,Public Works,{unit},Streets,51,Personnel,{object_code},Salaries,{object_code},Salaries,1000.50,1200,100,700.25,50,\n"
        ));
    }
    body
}

pub fn revenue_csv(rows: &[(&str, &str)]) -> String {
    let mut body = format!("{REVENUE_HEADER}\n");
    for (category, source) in rows {
        body.push_str(&format!(
            "1000,General Fund,6200,Finance,6201,Treasury,{category},Taxes,{source},Property Tax,5000,6000,400,2500,2500,2500,50\n"
        ));
    }
    body
}

pub fn period(year: i32, month: u32) -> Period {
    let parsed = Period::new(year, month);
    assert!(parsed.is_ok());
    parsed.unwrap_or_else(|_| Period::from_date(chrono::NaiveDate::MIN))
}

pub fn datasets() -> DatasetIds {
    DatasetIds {
        expenses: EXPENSES_DATASET.to_string(),
        revenue: REVENUE_DATASET.to_string(),
    }
}

/// Publish target that records every upsert and can be told to reject a
/// given call (zero-based).
#[derive(Default)]
pub struct RecordingTarget {
    pub calls: RefCell<Vec<(String, Vec<CanonicalRecord>)>>,
    pub fail_on_call: Option<usize>,
}

impl RecordingTarget {
    pub fn failing_on(call: usize) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_on_call: Some(call),
        }
    }

    pub fn dataset_ids(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(dataset_id, _)| dataset_id.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl PublishTarget for RecordingTarget {
    fn upsert(&self, dataset_id: &str, records: &[CanonicalRecord]) -> ClientResult<UpsertReceipt> {
        let call = self.calls.borrow().len();
        self.calls
            .borrow_mut()
            .push((dataset_id.to_string(), records.to_vec()));
        if self.fail_on_call == Some(call) {
            return Err(ClientError::publish_failed(dataset_id, "HTTP 500: upstream unavailable"));
        }
        Ok(UpsertReceipt {
            rows_created: Some(i64::try_from(records.len()).unwrap_or(i64::MAX)),
            rows_updated: Some(0),
            rows_deleted: Some(0),
            errors: Some(0),
        })
    }
}

pub fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> Option<(String, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").ok()?;
    let address = listener.local_addr().ok()?;
    let handle = thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut raw = Vec::new();
        let mut buffer = [0_u8; 4096];
        while let Ok(read) = stream.read(&mut buffer) {
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&buffer[..read]);
            if request_is_complete(&raw) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
    });
    Some((format!("http://{address}"), handle))
}

fn request_is_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..end]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    raw.len() >= end + 4 + content_length
}
