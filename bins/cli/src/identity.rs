//! Who is running the command.

use tripsplit_core::trip::ParticipantContext;
use tripsplit_shared::types::ParticipantId;
use tripsplit_shared::{AppError, AppResult};

/// Identity given on the command line (`--as`) or via `TRIPSPLIT_AS`.
#[derive(Debug, Clone, Default)]
pub struct CliIdentity {
    participant: Option<ParticipantId>,
}

impl CliIdentity {
    /// Wraps the raw `--as` value; blank means signed out.
    pub fn new(raw: Option<&str>) -> Self {
        let participant = raw
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ParticipantId::from);
        Self { participant }
    }
}

impl ParticipantContext for CliIdentity {
    fn current_participant_id(&self) -> Option<ParticipantId> {
        self.participant.clone()
    }
}

/// The acting participant, or an error telling the user how to sign in.
pub fn require_participant(context: &impl ParticipantContext) -> AppResult<ParticipantId> {
    context.current_participant_id().ok_or_else(|| {
        AppError::Validation("No participant given; pass --as <id> or set TRIPSPLIT_AS".to_string())
    })
}
