//! Core flow types.
//!
//! This module contains the pure data the engine is built from:
//! - Screen nodes and their input requirements
//! - Edge conditions, evaluated as pure predicates
//! - The per-session trail of entered screens
//!
//! Nothing here performs I/O or holds mutable shared state.

mod condition;
mod screen;
mod trail;

pub use condition::{Condition, EdgeContext};
pub use screen::{Display, Prompt, Requirement, ScreenId, ScreenNode};
pub use trail::{ScreenStep, ScreenTrail};
