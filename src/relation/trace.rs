use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, trace};

use super::Relation;
use crate::{math::Set, Automaton, Label, Show, State, StateSet};

/// Explores pairs of epsilon closed configurations of `left` and `right` in breadth first order,
/// starting from `(s, t)`. Returns the first word on which the two differ, where the configurations
/// differ if one of them offers a label that the other does not offer or, when `accepting` is
/// set, if exactly one of them contains a terminal state. Since the search is breadth first, the
/// returned word is as short as possible.
fn distinguish<L: Label>(
    left: &Automaton<L>,
    right: &Automaton<L>,
    s: &StateSet,
    t: &StateSet,
    accepting: bool,
) -> Option<Vec<L>> {
    let start = (left.epsilon_closure(s.iter().copied()), right.epsilon_closure(t.iter().copied()));
    let mut seen: Set<(StateSet, StateSet)> = Set::default();
    let mut queue = VecDeque::new();
    seen.insert(start.clone());
    queue.push_back((start, vec![]));

    let offered = |automaton: &Automaton<L>, configuration: &StateSet| -> BTreeSet<L> {
        configuration
            .iter()
            .flat_map(|&q| automaton.labels_from(q))
            .flatten()
            .cloned()
            .collect()
    };
    let meets_terminal = |automaton: &Automaton<L>, configuration: &StateSet| {
        configuration.iter().any(|&q| automaton.is_terminal(q))
    };

    while let Some(((s, t), word)) = queue.pop_front() {
        trace!(
            "comparing {} with {} after {}",
            State::show_collection(s.iter()),
            State::show_collection(t.iter()),
            word.show()
        );
        if accepting && meets_terminal(left, &s) != meets_terminal(right, &t) {
            return Some(word);
        }

        let (from_left, from_right) = (offered(left, &s), offered(right, &t));
        if !accepting {
            if let Some(label) = from_left.symmetric_difference(&from_right).next() {
                let mut word = word;
                word.push(label.clone());
                return Some(word);
            }
        }

        for label in from_left.union(&from_right) {
            let next = (
                left.epsilon_closure(left.step(&s, label)),
                right.epsilon_closure(right.step(&t, label)),
            );
            if next.0.is_empty() && next.1.is_empty() {
                continue;
            }
            if seen.insert(next.clone()) {
                let mut longer = word.clone();
                longer.push(label.clone());
                queue.push_back((next, longer));
            }
        }
    }
    debug!("no distinguishing word after exploring {} pairs", seen.len());
    None
}

/// Trace equivalence: two sets of states are related if the sequences of labels that can be read
/// from them coincide. Terminal flags play no role, every prefix of a run counts as a trace.
///
/// The relation is decided by exploring pairs of epsilon closed configurations. If the two sides
/// disagree, the shortest distinguishing sequence is kept and can be inspected with
/// [`TraceEquivalence::counterexample`].
pub struct TraceEquivalence<'a, L> {
    left: &'a Automaton<L>,
    right: &'a Automaton<L>,
    counterexample: Option<Vec<L>>,
}

impl<'a, L: Label> TraceEquivalence<'a, L> {
    /// Binds the relation to the given automata.
    pub fn new(left: &'a Automaton<L>, right: &'a Automaton<L>) -> Self {
        Self {
            left,
            right,
            counterexample: None,
        }
    }

    /// The sequence of labels that distinguished the sets in the most recent query, if they were
    /// found to differ. It can be read by one side but not by the other.
    pub fn counterexample(&self) -> Option<&[L]> {
        self.counterexample.as_deref()
    }
}

impl<'a, L: Label> Relation<L> for TraceEquivalence<'a, L> {
    fn left(&self) -> &Automaton<L> {
        self.left
    }

    fn right(&self) -> &Automaton<L> {
        self.right
    }

    fn equivalent(&mut self, s: State, t: State) -> bool {
        if !self.left.contains(s) || !self.right.contains(t) {
            return false;
        }
        self.equivalent_sets(&StateSet::from([s]), &StateSet::from([t]))
    }

    fn equivalent_sets(&mut self, s: &StateSet, t: &StateSet) -> bool {
        self.counterexample = distinguish(self.left, self.right, s, t, false);
        self.counterexample.is_none()
    }
}

/// Language equivalence: two sets of states are related if they accept the same words. This is
/// decided like [`TraceEquivalence`], except that configurations are compared by whether they
/// contain a terminal state, and a label may lead to the empty configuration on one side.
pub struct LanguageEquivalence<'a, L> {
    left: &'a Automaton<L>,
    right: &'a Automaton<L>,
    counterexample: Option<Vec<L>>,
}

impl<'a, L: Label> LanguageEquivalence<'a, L> {
    /// Binds the relation to the given automata.
    pub fn new(left: &'a Automaton<L>, right: &'a Automaton<L>) -> Self {
        Self {
            left,
            right,
            counterexample: None,
        }
    }

    /// A shortest word accepted by exactly one side in the most recent query, if there is one.
    pub fn counterexample(&self) -> Option<&[L]> {
        self.counterexample.as_deref()
    }
}

impl<'a, L: Label> Relation<L> for LanguageEquivalence<'a, L> {
    fn left(&self) -> &Automaton<L> {
        self.left
    }

    fn right(&self) -> &Automaton<L> {
        self.right
    }

    fn equivalent(&mut self, s: State, t: State) -> bool {
        if !self.left.contains(s) || !self.right.contains(t) {
            return false;
        }
        self.equivalent_sets(&StateSet::from([s]), &StateSet::from([t]))
    }

    fn equivalent_sets(&mut self, s: &StateSet, t: &StateSet) -> bool {
        self.counterexample = distinguish(self.left, self.right, s, t, true);
        self.counterexample.is_none()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn shortest_distinguishing_trace() {
        let left = parse("ab(c+d)").unwrap();
        let right = parse("abc+abe").unwrap();
        let mut traces = TraceEquivalence::new(&left, &right);
        assert!(!are_equivalent(&mut traces));
        assert_eq!(traces.counterexample(), Some(&['a', 'b', 'd'][..]));
    }

    #[test]
    fn traces_ignore_acceptance() {
        let left = parse("ab").unwrap();
        let right = parse("a+ab").unwrap();
        assert!(are_equivalent(&mut TraceEquivalence::new(&left, &right)));

        let mut language = LanguageEquivalence::new(&left, &right);
        assert!(!are_equivalent(&mut language));
        assert_eq!(language.counterexample(), Some(&['a'][..]));
    }

    #[test_log::test]
    fn language_equivalence_sees_through_dead_ends() {
        // b leads into a dead end on the left only
        let mut left = Automaton::new();
        left.from("p").on('a').go("q");
        left.from("p").on('b').go("dead");
        left.initial("p");
        left.terminal("q");

        let right = parse("a").unwrap();
        assert!(!are_equivalent(&mut TraceEquivalence::new(&left, &right)));
        assert!(are_equivalent(&mut LanguageEquivalence::new(&left, &right)));

        let both = parse("(a+b)*a").unwrap();
        let deterministic = both.to_dfa().reduce();
        assert!(are_equivalent(&mut LanguageEquivalence::new(&both, &deterministic)));
    }
}
