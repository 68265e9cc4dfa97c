pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod protocol;
pub mod runner;

pub use client::JudgeClient;
pub use config::JudgeConfig;
pub use error::{JudgeError, Result};
pub use runner::PollingRunner;
