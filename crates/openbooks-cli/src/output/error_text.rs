use openbooks_client::ClientError;

use super::publish_text::render_run_report;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "The run did not complete cleanly.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    if error.code == "publish_incomplete"
        && let Some(report) = error.data.as_ref()
        && let Ok(report_lines) = render_run_report(report)
    {
        lines.push(String::new());
        lines.extend(report_lines);
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Rerun with -v for debug logging.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}
