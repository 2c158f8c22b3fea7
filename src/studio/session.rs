use super::Outcome;
use crate::models::Archetype;

/// Where the current generation cycle stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    InFlight,
    Succeeded(Outcome),
    /// Holds the user-facing message.
    Failed(String),
}

/// Snapshot of the studio session. Every transition produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub archetype: Archetype,
    pub phase: Phase,
    pub request_id: Option<String>,
}

impl SessionState {
    pub fn idle(archetype: Archetype) -> Self {
        Self {
            archetype,
            phase: Phase::Idle,
            request_id: None,
        }
    }

    /// Starts a new cycle. Any previous result or error is dropped here.
    pub fn validating(&self, archetype: Archetype, request_id: impl Into<String>) -> Self {
        Self {
            archetype,
            phase: Phase::Validating,
            request_id: Some(request_id.into()),
        }
    }

    pub fn in_flight(&self) -> Self {
        self.with_phase(Phase::InFlight)
    }

    pub fn succeeded(&self, outcome: Outcome) -> Self {
        self.with_phase(Phase::Succeeded(outcome))
    }

    pub fn failed(&self, message: impl Into<String>) -> Self {
        self.with_phase(Phase::Failed(message.into()))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Validating | Phase::InFlight)
    }

    pub fn result(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::Succeeded(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    fn with_phase(&self, phase: Phase) -> Self {
        Self {
            archetype: self.archetype,
            phase,
            request_id: self.request_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeneratedImage;

    #[test]
    fn test_new_cycle_clears_previous_result() {
        let done = SessionState::idle(Archetype::Pose)
            .validating(Archetype::Pose, "req-1")
            .in_flight()
            .succeeded(Outcome::Image(GeneratedImage::new("image/png", "AAAA")));
        assert!(done.result().is_some());
        assert!(!done.is_busy());

        let next = done.validating(Archetype::Pose, "req-2");
        assert!(next.result().is_none());
        assert!(next.is_busy());
        assert_eq!(next.request_id.as_deref(), Some("req-2"));

        let failed = next.failed("Missing required image: Base Image (Person).");
        assert_eq!(
            failed.error(),
            Some("Missing required image: Base Image (Person).")
        );
        assert!(failed.result().is_none());
    }
}
