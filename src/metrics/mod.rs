//! Stateful accumulators: max, sum, average, episodic average, rate and raw log.
//!
//! Every kind shares one contract (`update`, `get`, `reset`) and is represented
//! as a case of a flat enum rather than a type hierarchy.

pub mod accumulator;
pub mod reading;

pub use accumulator::*;
pub use reading::*;
