use crate::cli::Commands;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Publish { json, .. } | Commands::Tasks { json, .. } => {
            if *json {
                OutputMode::Json
            } else {
                OutputMode::Text
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputMode, mode_for_command};
    use crate::cli::parse_from;

    #[test]
    fn mode_uses_json_for_publish_with_json_flag() {
        let parsed = parse_from(["openbooks", "publish", "--dry-run", "--json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
        }
    }

    #[test]
    fn mode_uses_json_for_tasks_with_json_flag() {
        let parsed = parse_from(["openbooks", "tasks", "--json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
        }
    }

    #[test]
    fn mode_uses_text_without_json_flag() {
        for args in [["openbooks", "publish"], ["openbooks", "tasks"]] {
            let parsed = parse_from(args);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
            }
        }
    }
}
