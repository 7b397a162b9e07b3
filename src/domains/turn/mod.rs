pub mod controller;
pub mod score;

pub use controller::*;
pub use score::*;
