use chrono::Utc;
use log::{error as log_error, info as log_info, warn as log_warn};
use std::sync::Arc;

/// Domain-level logging port. Turn-by-turn decisions of an agent are reported
/// here; adapters decide where they end up. Never fails from the caller's view.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;

/// Match journal written through `fast_log`, one line per record, tagged with the agent.
pub struct FileLogger {
    agent: String,
}

impl FileLogger {
    /// Installs the process-wide `fast_log` file appender. Call once.
    pub fn init(path: &str) -> Result<(), Box<dyn std::error::Error>> {
        fast_log::init(
            fast_log::config::Config::new()
                .file(path)
                .level(log::LevelFilter::Info),
        )?;
        Ok(())
    }

    pub fn new(agent: impl Into<String>) -> Self {
        Self { agent: agent.into() }
    }
}

impl DomainLogger for FileLogger {
    fn info(&self, msg: &str) {
        log_info!("{} [{}] {}", Utc::now().to_rfc3339(), self.agent, msg);
    }

    fn warn(&self, msg: &str) {
        log_warn!("{} [{}] {}", Utc::now().to_rfc3339(), self.agent, msg);
    }

    fn error(&self, msg: &str) {
        log_error!("{} [{}] {}", Utc::now().to_rfc3339(), self.agent, msg);
    }
}
