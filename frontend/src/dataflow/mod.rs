//! Dataflow primitives for reactive state
//!
//! - **[`Relay`]** - typed event stream from UI to an Actor
//! - **[`Actor`]** - single-value state owned by one processing task
//! - **[`Atom`]** - local UI state built on the two above
//!
//! Relays follow the `{source}_{event}_relay` naming pattern and views read
//! Actor state only through signals.

pub mod actor;
pub mod atom;
pub mod relay;

pub use actor::Actor;
pub use atom::Atom;
pub use relay::{Relay, relay};
