pub mod agent_runtime;

pub use agent_runtime::*;
