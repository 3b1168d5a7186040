//! Core domain types for Waypoint.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the engine.

mod edit;
mod ids;

pub use edit::{EditStatus, EditToolKind, FileEdit};
pub use ids::TurnId;
