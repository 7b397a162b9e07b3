pub mod events;
pub mod observation;
pub mod reconciler;

pub use events::*;
pub use observation::*;
pub use reconciler::*;
