use serde::Serialize;

/// Per-card refinement state: closed, form open, or request in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPhase {
    #[default]
    Closed,
    Editing,
    Submitting,
}

impl CardPhase {
    pub fn open(self) -> Self {
        match self {
            CardPhase::Submitting => CardPhase::Submitting,
            _ => CardPhase::Editing,
        }
    }

    /// Cancelling never interrupts a submission that is already in flight.
    pub fn cancel(self) -> Self {
        match self {
            CardPhase::Submitting => CardPhase::Submitting,
            _ => CardPhase::Closed,
        }
    }

    pub fn is_submitting(self) -> bool {
        self == CardPhase::Submitting
    }
}
