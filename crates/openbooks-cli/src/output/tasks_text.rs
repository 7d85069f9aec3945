use std::io;

use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_tasks(data: &Value) -> io::Result<String> {
    let tasks = data
        .get("tasks")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("tasks output requires tasks"))?;

    let target = data.get("target").cloned().unwrap_or(Value::Null);
    let mut lines = vec![format!(
        "Harvest plan for {:04}-{:02}:",
        target.get("year").and_then(Value::as_i64).unwrap_or(0),
        target.get("month").and_then(Value::as_u64).unwrap_or(0)
    )];

    if tasks.is_empty() {
        lines.push("  No departments are configured.".to_string());
        return Ok(lines.join("\n"));
    }

    let columns = [
        Column {
            name: "Dept",
            align: Align::Left,
        },
        Column {
            name: "Date",
            align: Align::Left,
        },
        Column {
            name: "FY",
            align: Align::Right,
        },
        Column {
            name: "Expenses key",
            align: Align::Left,
        },
        Column {
            name: "Revenue key",
            align: Align::Left,
        },
    ];
    let rows = tasks
        .iter()
        .map(|task| {
            vec![
                text(task, "department"),
                text(task, "date"),
                task.get("fiscal_year")
                    .and_then(Value::as_i64)
                    .unwrap_or(0)
                    .to_string(),
                text(task, "expenses_key"),
                text(task, "revenue_key"),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.push(String::new());
    lines.extend(format::render_table(&columns, &rows));
    Ok(lines.join("\n"))
}

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_tasks;

    #[test]
    fn renders_one_row_per_task() {
        let data = json!({
            "target": {"year": 2024, "month": 1},
            "tasks": [
                {
                    "department": "2400",
                    "date": "2023-12-31",
                    "fiscal_year": 2024,
                    "expenses_key": "expenses/2023-12-31_2400.csv",
                    "revenue_key": "revenue/2023-12-31_2400.csv"
                }
            ]
        });
        let rendered = render_tasks(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Harvest plan for 2024-01:"));
            assert!(text.contains("expenses/2023-12-31_2400.csv"));
            assert!(text.contains("revenue/2023-12-31_2400.csv"));
        }
    }

    #[test]
    fn empty_plan_says_so() {
        let rendered = render_tasks(&json!({"target": {"year": 2024, "month": 1}, "tasks": []}));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("No departments are configured."));
        }
    }
}
