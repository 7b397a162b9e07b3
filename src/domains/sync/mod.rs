pub mod adapter;
pub mod codec;
pub mod ports;
pub mod signals;
pub mod topics;

pub use adapter::*;
pub use codec::*;
pub use ports::*;
pub use signals::*;
pub use topics::*;
