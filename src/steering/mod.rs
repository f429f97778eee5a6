//! Heading-adjustment heuristics
//!
//! Every heading change made here goes through `Agent::change_heading`.

pub mod edges;
pub mod proximity;

pub use edges::{avoid_edges, Wall};
pub use proximity::{avoid_collision, choose_correction, predicted_distance, within_detection};
