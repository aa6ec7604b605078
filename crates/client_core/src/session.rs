use shared::domain::{IdeaId, SummaryId, UserId};

use crate::error::{ClientError, Result};

/// Identifiers handed back by earlier stages, reused by the later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowSession {
    pub user_id: Option<UserId>,
    pub idea_id: Option<IdeaId>,
    pub summary_id: Option<SummaryId>,
}

impl WorkflowSession {
    pub fn require_user(&self) -> Result<&UserId> {
        self.user_id
            .as_ref()
            .ok_or(ClientError::MissingContext("user id"))
    }

    pub fn require_idea(&self) -> Result<&IdeaId> {
        self.idea_id
            .as_ref()
            .ok_or(ClientError::MissingContext("idea id"))
    }

    pub fn require_summary(&self) -> Result<&SummaryId> {
        self.summary_id
            .as_ref()
            .ok_or(ClientError::MissingContext("summary id"))
    }
}
