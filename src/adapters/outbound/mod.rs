pub mod in_memory_bus;
#[cfg(feature = "kafka")]
pub mod kafka_bus;
pub mod loggers;

pub use in_memory_bus::*;
#[cfg(feature = "kafka")]
pub use kafka_bus::*;
pub use loggers::*;
