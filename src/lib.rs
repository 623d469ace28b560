//! Checkin-flow: a branching self-report check-in engine
//!
//! A check-in is a walk through a declarative graph of screens. Each screen
//! asks one question; the answer is validated, recorded, and used to pick
//! the next screen. Some screens show money figures derived from a pack cost
//! the user enters once and that is remembered across sessions.
//!
//! The engine keeps the same split throughout: the flow graph, the answer
//! ledger and the calculator are pure values, while the preference store and
//! the transition timers sit at the edges.
//!
//! # Core Concepts
//!
//! - **Flow graph**: screens and conditional edges, validated when built
//! - **Session**: an explicit value holding the current screen and answers
//! - **Controller**: validates input and decides the next screen
//! - **Runtime**: owns live sessions and applies delayed transitions
//!
//! # Example
//!
//! ```rust
//! use checkin_flow::{FlowCatalog, FlowVariant, Input, SessionController};
//! use checkin_flow::preference::{MemoryPreferenceStore, PreferenceStore};
//! use checkin_flow::calculator::DerivedFigures;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryPreferenceStore::new());
//! let controller = SessionController::new(FlowCatalog::standard().unwrap(), store.clone());
//!
//! let mut session = controller.begin(FlowVariant::SmokeCheckFinancial).unwrap();
//! for input in [Input::choose("Yes"), Input::choose("2–3"), Input::enter("200")] {
//!     session = controller.submit_now(&session, input).unwrap();
//! }
//!
//! assert_eq!(session.current_screen(), &"financial");
//! assert!(store.is_set());
//! assert!(matches!(
//!     session.figures(),
//!     Some(DerivedFigures::Spend { today_cost: 25, monthly_projection: 750, .. })
//! ));
//! ```

pub mod calculator;
pub mod config;
pub mod core;
pub mod error;
pub mod graph;
pub mod ledger;
pub mod preference;
pub mod runtime;
pub mod scheduler;
pub mod session;

// Re-export commonly used types
pub use config::CheckInConfig;
pub use error::FlowError;
pub use graph::{FlowBuilder, FlowCatalog, FlowDefinition, FlowVariant};
pub use runtime::CheckInRuntime;
pub use session::{Input, Session, SessionController, SessionId};
