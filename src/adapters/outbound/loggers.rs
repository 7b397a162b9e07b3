use crate::domains::logger::{DomainLogger, DynLogger, FileLogger};
use std::sync::Arc;

/// Routes domain log lines into the `tracing` pipeline, tagged with the agent name.
pub struct ConsoleLogger {
    agent: String,
}

impl ConsoleLogger {
    pub fn new(agent: impl Into<String>) -> Self {
        Self { agent: agent.into() }
    }
}

impl DomainLogger for ConsoleLogger {
    fn info(&self, msg: &str) {
        tracing::info!(agent = %self.agent, "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(agent = %self.agent, "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(agent = %self.agent, "{}", msg);
    }
}

struct NoopLogger;

impl DomainLogger for NoopLogger {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// Discards everything; the default for unit tests.
pub fn init_noop_logger() -> DynLogger {
    Arc::new(NoopLogger)
}

/// Forwards every record to each sink in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.error(msg));
    }
}

pub fn init_file_logger(path: &str, agent: &str) -> Result<DynLogger, String> {
    FileLogger::init(path).map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FileLogger::new(agent)))
}

/// Console logging, plus a match journal file when `file` is given and can be opened.
pub fn init_agent_logger(file: Option<&str>, agent: &str) -> DynLogger {
    let console: DynLogger = Arc::new(ConsoleLogger::new(agent));
    let Some(path) = file else {
        return console;
    };
    match init_file_logger(path, agent) {
        Ok(journal) => Arc::new(MultiLogger::new(vec![console, journal])),
        Err(e) => {
            tracing::warn!("{}; journaling to console only", e);
            console
        }
    }
}
