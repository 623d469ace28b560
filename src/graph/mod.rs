//! Flow graphs: screens, edges and the variants built from them.
//!
//! A [`FlowDefinition`] is immutable once built. [`FlowBuilder`] is the only
//! way to make one and rejects any graph with unreachable screens, dead
//! ends or answers that match zero or several edges.

mod builder;
mod catalog;
mod definition;
mod error;

pub use builder::FlowBuilder;
pub use catalog::{
    quick_check_in, smoke_check_basic, smoke_check_financial, FlowCatalog, FlowVariant,
    UnknownVariant,
};
pub use definition::{Edge, FlowDefinition, FlowDocument};
pub use error::{BuildError, GraphIntegrityError};
