pub mod divergence;
pub mod message;

pub use divergence::{evaluate, AlertDecision};
