//! Arena state and the viewport that gates what gets reported

pub mod arena;
pub mod viewport;

pub use arena::{HaltReason, World};
pub use viewport::Viewport;
