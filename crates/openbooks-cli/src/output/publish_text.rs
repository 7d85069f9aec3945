use std::io;

use serde_json::{Map, Value};

use super::format::{self, Align, Column};

pub fn render_publish_run(data: &Value) -> io::Result<String> {
    let dry_run = data
        .get("dry_run")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut lines = Vec::new();
    if dry_run {
        lines.push("Dry run completed. Nothing was submitted.".to_string());
    } else {
        lines.push("Publish completed successfully.".to_string());
    }
    lines.push(String::new());
    lines.extend(render_run_report(data)?);
    Ok(lines.join("\n"))
}

pub fn render_run_report(data: &Value) -> io::Result<Vec<String>> {
    let summary = data
        .get("summary")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("publish output requires summary"))?;

    let mut lines = vec!["Summary:".to_string()];
    let entries = vec![
        ("Run ID:", value_str(data, "run_id").to_string()),
        ("Target:", describe_target(data.get("target"))),
        ("Mode:", describe_mode(value_str(data, "mode"))),
        ("Files listed:", get_u64(summary, "files_listed").to_string()),
        ("Files selected:", get_u64(summary, "files_selected").to_string()),
        ("Published:", get_u64(summary, "published").to_string()),
        ("Dry run:", get_u64(summary, "dry_run").to_string()),
        ("Skipped:", get_u64(summary, "skipped").to_string()),
        ("Failed:", get_u64(summary, "failed").to_string()),
        (
            "Records submitted:",
            get_u64(summary, "records_submitted").to_string(),
        ),
    ];
    lines.extend(format::key_value_rows(&entries, 2));

    let files = data
        .get("files")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    lines.push(String::new());
    if files.is_empty() {
        lines.push("No report files were in scope.".to_string());
        return Ok(lines);
    }

    lines.push("Files:".to_string());
    let columns = [
        Column {
            name: "Status",
            align: Align::Left,
        },
        Column {
            name: "Records",
            align: Align::Right,
        },
        Column {
            name: "Created",
            align: Align::Right,
        },
        Column {
            name: "Updated",
            align: Align::Right,
        },
        Column {
            name: "Key",
            align: Align::Left,
        },
        Column {
            name: "Note",
            align: Align::Left,
        },
    ];
    let rows = files.iter().map(file_row).collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table(&columns, &rows));
    Ok(lines)
}

fn file_row(file: &Value) -> Vec<String> {
    vec![
        value_str(file, "status").to_string(),
        file.get("records")
            .and_then(Value::as_u64)
            .unwrap_or(0)
            .to_string(),
        optional_count(file, "rows_created"),
        optional_count(file, "rows_updated"),
        value_str(file, "key").to_string(),
        file_note(file),
    ]
}

fn file_note(file: &Value) -> String {
    if let Some(error) = file.get("error") {
        return format!(
            "{}: {}",
            value_str(error, "code"),
            value_str(error, "message")
        );
    }

    let collisions = file
        .get("identifier_collisions")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if collisions > 0 {
        return format!("{collisions} row_identifier collision(s)");
    }
    String::new()
}

fn describe_target(target: Option<&Value>) -> String {
    let Some(target) = target else {
        return "unknown".to_string();
    };
    let year = target.get("year").and_then(Value::as_i64).unwrap_or(0);
    let month = target.get("month").and_then(Value::as_u64).unwrap_or(0);
    let fiscal_year = target
        .get("fiscal_year")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let fiscal_month = target
        .get("fiscal_month")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    format!("{year:04}-{month:02} (FY{fiscal_year} month {fiscal_month})")
}

fn describe_mode(mode: &str) -> String {
    match mode {
        "current_and_previous" => "target month and previous month".to_string(),
        "republish_all" => "every stored file".to_string(),
        other => other.to_string(),
    }
}

fn optional_count(file: &Value, key: &str) -> String {
    file.get(key)
        .and_then(Value::as_i64)
        .map(|value| value.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn value_str<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn get_u64(map: &Map<String, Value>, key: &str) -> u64 {
    map.get(key).and_then(Value::as_u64).unwrap_or(0)
}
