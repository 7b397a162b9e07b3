pub mod knowledge;
pub mod logger;
pub mod pathfinding;
pub mod reconciliation;
pub mod sync;
pub mod turn;

pub use knowledge::*;
pub use logger::*;
pub use pathfinding::*;
pub use reconciliation::*;
pub use sync::*;
pub use turn::*;
