pub mod coordinate;
pub mod grid;
pub mod render;
pub mod store;

pub use coordinate::*;
pub use grid::*;
pub use render::*;
pub use store::*;
