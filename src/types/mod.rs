pub mod chart;
pub mod observation;
pub mod prediction;

pub use chart::*;
pub use observation::*;
pub use prediction::*;
