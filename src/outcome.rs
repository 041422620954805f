use crate::tour::Tour;

/// Terminal result of one search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every square was visited.
    Complete(Tour),
    /// Every ordering from the start square was tried without success.
    Exhausted,
    /// The search observed its cancel token before finishing.
    Cancelled,
}

impl Outcome {
    pub fn tour(&self) -> Option<&Tour> {
        match self {
            Outcome::Complete(tour) => Some(tour),
            _ => None,
        }
    }

    pub fn into_tour(self) -> Option<Tour> {
        match self {
            Outcome::Complete(tour) => Some(tour),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete(_))
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Outcome::Exhausted)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Complete(tour) => write!(f, "Tour found ({} squares)", tour.len()),
            Outcome::Exhausted => write!(f, "No solution found"),
            Outcome::Cancelled => write!(f, "Cancelled"),
        }
    }
}
