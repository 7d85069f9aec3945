pub mod calendar;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod harvest;
mod pipeline;
pub mod publish;
pub mod record;
pub mod report;
pub mod storage;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
