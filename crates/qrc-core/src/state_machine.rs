//! Edit phases and the transitions between them

use crate::error::TransitionError;

/// Where the editor stands relative to the persisted code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditPhase {
    /// Draft equals the last committed values
    Clean,
    /// At least one field differs from its committed value
    Dirty,
    /// A create or update is in flight
    Submitting,
}

impl EditPhase {
    /// Lowercase name for logs
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EditPhase::Clean => "clean",
            EditPhase::Dirty => "dirty",
            EditPhase::Submitting => "submitting",
        }
    }
}

impl std::fmt::Display for EditPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates a phase transition.
///
/// # Errors
/// Returns [`TransitionError::Illegal`] if `to` is not reachable from `from`.
pub fn validate_transition(from: EditPhase, to: EditPhase) -> Result<(), TransitionError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(TransitionError::Illegal { from, to })
    }
}

/// Phases reachable in one step from `from`
///
/// `Clean -> Submitting` covers creating a code seeded without an id; an
/// unchanged persisted code never dispatches.
#[must_use]
pub fn allowed_transitions(from: EditPhase) -> &'static [EditPhase] {
    use EditPhase::{Clean, Dirty, Submitting};
    match from {
        Clean => &[Dirty, Submitting],
        Dirty => &[Clean, Submitting],
        // Dirty when edits landed while the request was in flight, or on failure
        Submitting => &[Clean, Dirty],
    }
}

fn allowed(from: EditPhase, to: EditPhase) -> bool {
    allowed_transitions(from).contains(&to)
}
