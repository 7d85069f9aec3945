use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::calendar::Period;
use crate::report::ReportType;
use crate::{ClientError, ClientResult};

const SOURCE_KEY_PATTERN: &str = r"^(?P<report>expenses|revenue)/(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})_(?P<department>[0-9A-Za-z]{4})\.csv$";

fn source_key_regex() -> ClientResult<&'static Regex> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(SOURCE_KEY_PATTERN))
        .as_ref()
        .map_err(|error| ClientError::internal_pattern(&error.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceDescriptor {
    pub(crate) key: String,
    pub(crate) report_type: ReportType,
    pub(crate) period: Period,
    pub(crate) department: String,
}

impl SourceDescriptor {
    pub(crate) fn parse(key: &str) -> ClientResult<Self> {
        let captures = source_key_regex()?
            .captures(key)
            .ok_or_else(|| ClientError::malformed_source_key(key))?;

        let report_type = ReportType::from_dir(&captures["report"])
            .ok_or_else(|| ClientError::malformed_source_key(key))?;
        let year = captures["year"]
            .parse::<i32>()
            .map_err(|_| ClientError::malformed_source_key(key))?;
        let month = captures["month"]
            .parse::<u32>()
            .map_err(|_| ClientError::malformed_source_key(key))?;
        let period = Period::new(year, month).map_err(|_| ClientError::malformed_source_key(key))?;

        Ok(Self {
            key: key.to_string(),
            report_type,
            period,
            department: captures["department"].to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    CurrentAndPrevious,
    RepublishAll,
}

impl SelectionMode {
    pub fn from_replace_flag(replace: bool) -> Self {
        if replace {
            Self::RepublishAll
        } else {
            Self::CurrentAndPrevious
        }
    }

    /// Periods eligible under this mode; empty means unrestricted.
    pub fn window(self, target: Period) -> Vec<Period> {
        match self {
            Self::CurrentAndPrevious => vec![target, target.previous()],
            Self::RepublishAll => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RejectedKey {
    pub(crate) key: String,
    pub(crate) error: ClientError,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Selection {
    pub(crate) selected: Vec<SourceDescriptor>,
    pub(crate) rejected: Vec<RejectedKey>,
    pub(crate) out_of_window: usize,
}

pub(crate) fn select_batches(
    report: ReportType,
    keys: &[String],
    target: Period,
    mode: SelectionMode,
) -> Selection {
    let window = mode.window(target);
    let mut selection = Selection::default();

    for key in keys {
        if key.ends_with('/') {
            continue;
        }

        let descriptor = match SourceDescriptor::parse(key) {
            Ok(descriptor) if descriptor.report_type == report => descriptor,
            Ok(_) => {
                selection.rejected.push(RejectedKey {
                    key: key.clone(),
                    error: ClientError::malformed_source_key(key),
                });
                continue;
            }
            Err(error) => {
                selection.rejected.push(RejectedKey {
                    key: key.clone(),
                    error,
                });
                continue;
            }
        };

        if mode == SelectionMode::RepublishAll || window.contains(&descriptor.period) {
            selection.selected.push(descriptor);
        } else {
            selection.out_of_window += 1;
        }
    }

    selection
}
