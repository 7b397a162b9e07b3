use fogcoin_agent::adapters::outbound::{init_agent_logger, init_noop_logger, ConsoleLogger, MultiLogger};
use fogcoin_agent::domains::logger::{DomainLogger, DynLogger};
use std::sync::{Arc, Mutex};

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self { Self { messages: Arc::new(Mutex::new(Vec::new())) } }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

#[test]
fn test_multi_logger_fans_out() {
    let first = Arc::new(BridgeCapture::new());
    let second = Arc::new(BridgeCapture::new());
    let multi = MultiLogger::new(vec![
        first.clone() as DynLogger,
        init_noop_logger(),
        second.clone() as DynLogger,
    ]);

    multi.info("one");
    multi.warn("two");
    multi.error("three");

    for capture in [&first, &second] {
        let msgs = capture.messages.lock().unwrap();
        assert_eq!(*msgs, vec!["INFO:one", "WARN:two", "ERR:three"]);
    }
}

#[test]
fn test_console_and_noop_loggers_accept_calls() {
    let console = ConsoleLogger::new("alice");
    console.info("hello");
    console.error("oops");

    // No file configured: console only, never fails.
    let agent = init_agent_logger(None, "alice");
    agent.warn("still fine");

    let noop = init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");
}
