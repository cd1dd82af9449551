//! Synthetic personnel dataset generation.
//!
//! The two generators with real invariants live in [`hierarchy`] (acyclic
//! manager assignment) and [`shifts`] (non-overlapping on-call intervals).
//! [`dataset`] composes them with the plain sampling helpers into a full,
//! referentially consistent [`Dataset`].

pub mod catalog;
pub mod clock;
pub mod dataset;
pub mod hierarchy;
pub mod records;
pub mod sampling;
pub mod shifts;

use thiserror::Error;

pub use clock::{ClockTime, DayOfWeek};
pub use dataset::{Dataset, DatasetBuilder, RowCounts};
pub use hierarchy::{
    EmployeeId, HierarchyBuilder, HierarchyError, HierarchyPolicy, ManagerRelation,
    assign_manager, would_create_cycle,
};
pub use shifts::{ShiftInterval, ShiftPolicy, generate_day_shifts};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("cannot draw {requested} unique employee ids from a space of {available}")]
    IdSpaceExhausted { requested: u64, available: u64 },
}
