use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::report::ReportType;
use crate::{ClientError, ClientResult};

pub const STORAGE_ROOT_VAR: &str = "OPENBOOKS_STORAGE_ROOT";
pub const DEPARTMENTS_VAR: &str = "OPENBOOKS_DEPARTMENTS";
pub const PUBLISH_TIMEOUT_VAR: &str = "OPENBOOKS_PUBLISH_TIMEOUT_SECS";
pub const SOCRATA_HOST_VAR: &str = "SO_WEB";
pub const SOCRATA_TOKEN_VAR: &str = "SO_TOKEN";
pub const SOCRATA_KEY_VAR: &str = "SO_KEY";
pub const SOCRATA_SECRET_VAR: &str = "SO_SECRET";
pub const EXPENSES_DATASET_VAR: &str = "EXP_DATASET";
pub const REVENUE_DATASET_VAR: &str = "REV_DATASET";

pub const DEFAULT_DEPARTMENTS: [&str; 2] = ["2400", "6200"];

pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetIds {
    pub expenses: String,
    pub revenue: String,
}

impl DatasetIds {
    pub fn for_report(&self, report: ReportType) -> &str {
        match report {
            ReportType::Expenses => &self.expenses,
            ReportType::Revenue => &self.revenue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocrataSettings {
    pub base_url: String,
    pub app_token: Option<String>,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

/// Publish credentials and dataset ids are only checked when a command
/// needs them, so `tasks` and dry runs work without them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub storage_root: PathBuf,
    pub departments: Vec<String>,
    pub publish_timeout: Duration,
    expenses_dataset: Option<String>,
    revenue_dataset: Option<String>,
    socrata_host: Option<String>,
    socrata_token: Option<String>,
    socrata_key: Option<String>,
    socrata_secret: Option<String>,
}

impl PipelineConfig {
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            storage_root: resolve_storage_root(read(STORAGE_ROOT_VAR))?,
            departments: parse_departments(read(DEPARTMENTS_VAR))?,
            publish_timeout: parse_timeout(read(PUBLISH_TIMEOUT_VAR))?,
            expenses_dataset: read(EXPENSES_DATASET_VAR),
            revenue_dataset: read(REVENUE_DATASET_VAR),
            socrata_host: read(SOCRATA_HOST_VAR),
            socrata_token: read(SOCRATA_TOKEN_VAR),
            socrata_key: read(SOCRATA_KEY_VAR),
            socrata_secret: read(SOCRATA_SECRET_VAR),
        })
    }

    pub fn require_datasets(&self) -> ClientResult<DatasetIds> {
        match (&self.expenses_dataset, &self.revenue_dataset) {
            (Some(expenses), Some(revenue)) => Ok(DatasetIds {
                expenses: expenses.clone(),
                revenue: revenue.clone(),
            }),
            (expenses, revenue) => Err(ClientError::config_missing(&missing_vars(&[
                (EXPENSES_DATASET_VAR, expenses.is_none()),
                (REVENUE_DATASET_VAR, revenue.is_none()),
            ]))),
        }
    }

    pub fn require_socrata(&self) -> ClientResult<SocrataSettings> {
        match (&self.socrata_host, &self.socrata_key, &self.socrata_secret) {
            (Some(host), Some(username), Some(password)) => Ok(SocrataSettings {
                base_url: normalize_base_url(host),
                app_token: self.socrata_token.clone(),
                username: username.clone(),
                password: password.clone(),
                timeout: self.publish_timeout,
            }),
            (host, username, password) => Err(ClientError::config_missing(&missing_vars(&[
                (SOCRATA_HOST_VAR, host.is_none()),
                (SOCRATA_KEY_VAR, username.is_none()),
                (SOCRATA_SECRET_VAR, password.is_none()),
            ]))),
        }
    }
}

fn missing_vars(checks: &[(&'static str, bool)]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|(_, missing)| *missing)
        .map(|(name, _)| *name)
        .collect()
}

fn resolve_storage_root(configured: Option<String>) -> ClientResult<PathBuf> {
    let candidate = match configured {
        Some(value) => PathBuf::from(value),
        None => match home::home_dir() {
            Some(home_path) => home_path.join(".openbooks").join("storage"),
            None => return Err(ClientError::config_missing(&[STORAGE_ROOT_VAR])),
        },
    };

    absolutize(&candidate)
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| ClientError::config_invalid(STORAGE_ROOT_VAR, &error.to_string()))
}

fn parse_departments(configured: Option<String>) -> ClientResult<Vec<String>> {
    let Some(raw) = configured else {
        return Ok(DEFAULT_DEPARTMENTS
            .iter()
            .map(std::string::ToString::to_string)
            .collect());
    };

    let departments = raw
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(std::string::ToString::to_string)
        .collect::<Vec<String>>();

    if departments.is_empty() {
        return Err(ClientError::config_invalid(
            DEPARTMENTS_VAR,
            "expected a comma separated list of department codes",
        ));
    }

    if let Some(bad) = departments
        .iter()
        .find(|code| code.len() != 4 || !code.chars().all(|ch| ch.is_ascii_alphanumeric()))
    {
        return Err(ClientError::config_invalid(
            DEPARTMENTS_VAR,
            &format!("department code `{bad}` must be exactly 4 letters or digits"),
        ));
    }

    Ok(departments)
}

fn parse_timeout(configured: Option<String>) -> ClientResult<Duration> {
    let Some(raw) = configured else {
        return Ok(DEFAULT_PUBLISH_TIMEOUT);
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ClientError::config_invalid(
            PUBLISH_TIMEOUT_VAR,
            "timeout must be at least 1 second",
        )),
        Ok(seconds) => Ok(Duration::from_secs(seconds)),
        Err(_) => Err(ClientError::config_invalid(
            PUBLISH_TIMEOUT_VAR,
            "expected a whole number of seconds",
        )),
    }
}

fn normalize_base_url(host: &str) -> String {
    let trimmed = host.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
