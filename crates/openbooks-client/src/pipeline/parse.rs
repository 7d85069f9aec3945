use std::collections::HashMap;

use crate::{ClientError, ClientResult};

pub(crate) type RawRecord = HashMap<String, String>;

const UTF8_BOM: char = '\u{feff}';

pub(crate) fn parse_report(key: &str, content: &[u8]) -> ClientResult<Vec<RawRecord>> {
    let text = std::str::from_utf8(content)
        .map_err(|error| ClientError::source_parse_failed(key, &error.to_string()))?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| ClientError::source_parse_failed(key, &error.to_string()))?
        .iter()
        .map(std::string::ToString::to_string)
        .collect::<Vec<String>>();

    let mut rows = Vec::new();
    for result_row in reader.records() {
        let record =
            result_row.map_err(|error| ClientError::source_parse_failed(key, &error.to_string()))?;

        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect::<RawRecord>();
        rows.push(row);
    }

    Ok(rows)
}
