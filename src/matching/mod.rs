//! Matching engine: automatic pairing, manual grouping and unmatching
//!
//! Every operation takes the current collections by reference and returns new ones,
//! so a caller either adopts the complete result or keeps its previous state.

pub mod auto;
pub mod manual;
pub mod ranking;
pub mod unmatch;

pub use auto::*;
pub use manual::*;
pub use ranking::*;
pub use unmatch::*;
