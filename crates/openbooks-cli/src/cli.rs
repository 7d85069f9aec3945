use clap::{Parser, Subcommand};

pub const PUBLISH_AFTER_HELP: &str = "\
How publishing works:
  Report files are read from the storage root, one object per department
  and month, keyed `expenses/YYYY-MM-DD_DEPT.csv` or `revenue/YYYY-MM-DD_DEPT.csv`.

  By default only the target month and the month before it are published.
  Use --replace to republish every stored file.

  Each file becomes one upsert keyed by row_identifier, so reruns are safe.
  A failed file does not stop the others; the run exits 1 if any file failed.

Configuration (environment):
  OPENBOOKS_STORAGE_ROOT           Report bucket directory (default ~/.openbooks/storage)
  SO_WEB                           Open-data host, e.g. data.example.gov
  SO_TOKEN                         Application token (optional)
  SO_KEY, SO_SECRET                Publishing credentials
  EXP_DATASET, REV_DATASET         Expenses and revenue dataset ids
  OPENBOOKS_PUBLISH_TIMEOUT_SECS   Upsert timeout in seconds (default 900)

  --dry-run needs only the storage root.
";

#[derive(Debug, Parser)]
#[command(
    name = "openbooks",
    version,
    about = "publish monthly expenses and revenue reports to an open-data portal",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Log debug detail to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
    /// Log errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize stored reports and upsert them into the open-data datasets
    #[command(after_long_help = PUBLISH_AFTER_HELP)]
    Publish {
        /// Target year (defaults to the current year)
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=9999))]
        year: Option<i32>,
        /// Target month, 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Republish every stored file instead of the two-month window
        #[arg(long)]
        replace: bool,
        /// Prepare every batch but submit nothing
        #[arg(long)]
        dry_run: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show the harvest task plan and the object keys it produces
    Tasks {
        /// Target year (defaults to the current year)
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=9999))]
        year: Option<i32>,
        /// Target month, 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::{Commands, parse_from};

    #[test]
    fn parses_publish_flags() {
        let parsed = parse_from([
            "openbooks",
            "publish",
            "--year",
            "2024",
            "--month",
            "3",
            "--replace",
            "--dry-run",
            "--json",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(cli.command, Commands::Publish { .. }));
            if let Commands::Publish {
                year,
                month,
                replace,
                dry_run,
                json,
            } = cli.command
            {
                assert_eq!(year, Some(2024));
                assert_eq!(month, Some(3));
                assert!(replace && dry_run && json);
            }
        }
    }

    #[test]
    fn month_outside_calendar_is_rejected_at_parse_time() {
        for month in ["0", "13"] {
            let parsed = parse_from(["openbooks", "publish", "--month", month]);
            assert!(parsed.is_err());
            if let Err(error) = parsed {
                assert_eq!(error.kind(), ErrorKind::ValueValidation);
            }
        }
    }

    #[test]
    fn verbosity_flags_are_global_and_exclusive() {
        let verbose = parse_from(["openbooks", "tasks", "-v"]);
        assert!(verbose.is_ok());
        if let Ok(cli) = verbose {
            assert!(cli.verbose);
            assert!(!cli.quiet);
        }

        let both = parse_from(["openbooks", "-v", "-q", "tasks"]);
        assert!(both.is_err());
        if let Err(error) = both {
            assert_eq!(error.kind(), ErrorKind::ArgumentConflict);
        }
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        let parsed = parse_from(["openbooks"]);
        assert!(parsed.is_err());
    }
}
