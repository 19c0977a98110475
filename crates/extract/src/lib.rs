//! Pure parsing for mwatch: which publisher a URL belongs to, and what the
//! newest episode is according to a fetched page. No I/O happens here.

mod compare;
mod consts;
pub mod error;
mod item;
pub mod models;
pub mod page;
pub mod sites;

pub use crate::item::{SourceKind, TrackingItem, classify};
pub use crate::models::LatestEpisode;
