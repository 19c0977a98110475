//! What mwatch remembers between runs, and how a fresh observation is folded
//! into it.

pub mod error;
mod reconcile;
mod store;

pub use crate::reconcile::{UpdateEvent, reconcile};
pub use crate::store::{CURRENT_VERSION, PersistedEntry, StateFile, StateStore};
