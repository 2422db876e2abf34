//! Trips, membership, and the read-side view over a trip's records.
//!
//! - `types` - Trip record, membership and invite links
//! - `snapshot` - Complete collections and the balance summary built from them
//! - `ports` - Narrow interfaces to the auth provider and document store

pub mod ports;
pub mod snapshot;
pub mod types;

pub use ports::{ParticipantContext, SnapshotSource};
pub use snapshot::{Collection, TripSnapshot, TripSummary, ViewerPosition, summarize};
pub use types::Trip;
