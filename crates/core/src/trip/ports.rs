//! Interfaces to the external systems the ledger reads from.
//!
//! Identity and storage are passed in explicitly; nothing in the core reads
//! ambient session state.

use tripsplit_shared::types::{ParticipantId, TripId};

use super::snapshot::TripSnapshot;

/// Tells the core who is acting.
pub trait ParticipantContext {
    /// The signed-in participant, or `None` when nobody is signed in.
    fn current_participant_id(&self) -> Option<ParticipantId>;
}

/// Delivers the full current contents of a trip's collections.
pub trait SnapshotSource {
    /// Error raised by the underlying store.
    type Error;

    /// Loads the trip together with all of its expenses and settlements.
    ///
    /// Implementations must mark a collection incomplete rather than return
    /// a truncated read as if it were whole.
    fn load_snapshot(&self, trip_id: TripId) -> Result<TripSnapshot, Self::Error>;
}

impl<T: ParticipantContext + ?Sized> ParticipantContext for &T {
    fn current_participant_id(&self) -> Option<ParticipantId> {
        (**self).current_participant_id()
    }
}
