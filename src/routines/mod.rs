pub mod apy_divergence_routine;
pub mod routine;

pub use apy_divergence_routine::{ApyDivergenceRoutine, RunOutcome};
pub use routine::{Routine, RoutineError};
