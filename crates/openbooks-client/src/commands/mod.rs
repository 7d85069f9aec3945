pub mod publish;
pub mod tasks;
