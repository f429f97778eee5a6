pub mod agent;
pub mod heading;
pub mod role;

pub use agent::Agent;
pub use heading::Quadrant;
pub use role::Role;
