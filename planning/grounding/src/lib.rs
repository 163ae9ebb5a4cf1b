//! Grounding of lifted planning tasks.
//!
//! Given a task and the model of its relaxed reachability program (one atom per reachable
//! action or axiom instance), [`ground`] produces the ground actions, ground axioms and goal
//! literals of the task. The [`relaxation`] module grounds the rules of the same program into
//! the unary operators used by the additive and max heuristics, which [`operators`] writes to
//! (and reads from) the textual exchange file and [`unary`] simplifies.

mod actions;
mod atoms;
mod axioms;
mod conditions;
pub mod config;
pub mod errors;
mod fluents;
mod grounding;
mod model;
mod objects;
pub mod operators;
mod params;
pub mod relaxation;
mod sym;
mod task;
pub mod unary;

pub use actions::*;
pub use atoms::*;
pub use axioms::*;
pub use conditions::*;
pub use errors::GroundingError;
pub use fluents::*;
pub use grounding::*;
pub use model::*;
pub use objects::*;
pub use params::*;
pub use sym::*;
pub use task::*;

pub type Res<T> = anyhow::Result<T>;

/// Integer values of numeric fluents and action costs.
pub type IntValue = i64;
