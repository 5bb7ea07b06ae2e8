use std::collections::BTreeSet;

use crate::Show;

/// Opaque handle for a state of an [`crate::Automaton`]. Besides the position of the state in
/// the arena of its automaton, a handle also records which automaton it was created by. This
/// means handles are only meaningful for the automaton that created them, handing a state to a
/// different automaton (even a clone of the original) is detected and reported as an error.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct State {
    pub(crate) tag: u64,
    pub(crate) index: u32,
}

/// Ordered set of states. Being ordered, such sets are hashable and can be used as the
/// identity of a state in constructions like the subset construction.
pub type StateSet = BTreeSet<State>;

impl State {
    pub(crate) fn new(tag: u64, index: usize) -> Self {
        Self {
            tag,
            index: index as u32,
        }
    }

    /// Returns the position of the state in the arena of the automaton it belongs to. States
    /// are numbered consecutively in the order in which they were created, starting from zero.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.index)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.index)
    }
}

impl Show for State {
    fn show(&self) -> String {
        self.to_string()
    }
}

/// The data stored for each state in the arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StateFlags {
    pub(crate) initial: bool,
    pub(crate) terminal: bool,
}
