use super::State;
use crate::Show;

/// A transition leads from its `start` state to its `end` state while reading `label`. A label
/// of `None` marks a silent epsilon move, which is taken without consuming any input. Two
/// transitions are equal if and only if all three components are equal.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Transition<L> {
    /// The state in which the transition starts.
    pub start: State,
    /// The label that is read, `None` for an epsilon transition.
    pub label: Option<L>,
    /// The state that is reached.
    pub end: State,
}

impl<L> Transition<L> {
    /// Creates a new transition from its parts.
    pub fn new(start: State, label: Option<L>, end: State) -> Self {
        Self { start, label, end }
    }

    /// Creates a new epsilon transition from `start` to `end`.
    pub fn epsilon(start: State, end: State) -> Self {
        Self::new(start, None, end)
    }

    /// Returns true if this is a silent move.
    pub fn is_epsilon(&self) -> bool {
        self.label.is_none()
    }
}

impl<L: Show> Show for Transition<L> {
    fn show(&self) -> String {
        format!(
            "({}, {}, {})",
            self.start.show(),
            self.label.show(),
            self.end.show()
        )
    }
}

impl<L: Show> std::fmt::Debug for Transition<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}

impl<L> From<(State, Option<L>, State)> for Transition<L> {
    fn from((start, label, end): (State, Option<L>, State)) -> Self {
        Self::new(start, label, end)
    }
}
