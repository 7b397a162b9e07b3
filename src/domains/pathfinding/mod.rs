pub mod direction;
pub mod pathfinder;

pub use direction::*;
pub use pathfinder::*;
