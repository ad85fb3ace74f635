pub mod group;
pub mod ids;
pub mod task;

pub use group::*;
pub use ids::*;
pub use task::*;
