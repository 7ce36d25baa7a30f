//! Utility modules

pub mod amount;
pub mod sources;
pub mod validation;

pub use amount::*;
pub use sources::*;
pub use validation::*;
