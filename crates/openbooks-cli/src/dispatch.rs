use chrono::NaiveDate;
use openbooks_client::commands::publish::{self, PublishOptions};
use openbooks_client::commands::tasks::{self, TasksOptions};
use openbooks_client::config::PipelineConfig;
use openbooks_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: &Cli, config: &PipelineConfig, today: NaiveDate) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Publish {
            year,
            month,
            replace,
            dry_run,
            json: _,
        } => publish::run(
            config,
            &PublishOptions {
                year: *year,
                month: *month,
                replace: *replace,
                dry_run: *dry_run,
                today,
            },
        ),
        Commands::Tasks { year, month, .. } => tasks::run(
            config,
            &TasksOptions {
                year: *year,
                month: *month,
                today,
            },
        ),
    }
}
