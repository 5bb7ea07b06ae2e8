use super::{Assumptions, Relation};
use crate::{Automaton, Label, State, StateSet};

/// Strong bisimulation between the states of two automata. Two states are bisimilar if they agree
/// on being terminal, every transition of the one can be answered by a transition of the other
/// with the same label such that the targets are again bisimilar, and vice versa. Epsilon
/// transitions are treated like any other label, see [`super::WeakBisimulation`] for a version
/// which abstracts from them.
///
/// ```
/// use rational_automata::prelude::*;
///
/// let once = parse("a*").unwrap();
/// let unrolled = Automaton::builder()
///     .with_transitions([(0, 'a', 1), (1, 'a', 0)])
///     .with_initials([0])
///     .with_terminals([0, 1])
///     .build();
/// assert!(are_equivalent(&mut Bisimulation::new(&once, &unrolled)));
/// ```
pub struct Bisimulation<'a, L> {
    left: &'a Automaton<L>,
    right: &'a Automaton<L>,
    assumptions: Assumptions,
}

impl<'a, L: Label> Bisimulation<'a, L> {
    /// Binds the relation to the given automata.
    pub fn new(left: &'a Automaton<L>, right: &'a Automaton<L>) -> Self {
        Self {
            left,
            right,
            assumptions: Assumptions::default(),
        }
    }
}

/// Decides whether `s` in `left` and `t` in `right` are bisimilar, recording assumptions in
/// `assumptions`.
pub(super) fn bisimilar<L: Label>(
    left: &Automaton<L>,
    right: &Automaton<L>,
    assumptions: &mut Assumptions,
    s: State,
    t: State,
) -> bool {
    if !left.contains(s) || !right.contains(t) {
        return false;
    }
    assumptions.prove(s, t, |assumptions| {
        if left.is_terminal(s) != right.is_terminal(t) {
            return false;
        }
        let forth = left.delta(s).all(|move_left| {
            right
                .successors(t, &move_left.label)
                .any(|answer| bisimilar(left, right, assumptions, move_left.end, answer))
        });
        forth
            && right.delta(t).all(|move_right| {
                left.successors(s, &move_right.label)
                    .any(|answer| bisimilar(left, right, assumptions, answer, move_right.end))
            })
    })
}

impl<'a, L: Label> Relation<L> for Bisimulation<'a, L> {
    fn left(&self) -> &Automaton<L> {
        self.left
    }

    fn right(&self) -> &Automaton<L> {
        self.right
    }

    fn equivalent(&mut self, s: State, t: State) -> bool {
        bisimilar(self.left, self.right, &mut self.assumptions, s, t)
    }

    /// Two sets are related if every state of the one is bisimilar to some state of the other.
    fn equivalent_sets(&mut self, s: &StateSet, t: &StateSet) -> bool {
        s.iter()
            .all(|&p| t.iter().any(|&q| self.equivalent(p, q)))
            && t.iter()
                .all(|&q| s.iter().any(|&p| self.equivalent(p, q)))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn cycle<const N: usize>(length: usize, terminals: [usize; N]) -> Automaton<char> {
        Automaton::builder()
            .with_transitions((0..length).map(|i| (i, 'a', (i + 1) % length)))
            .with_initials([0])
            .with_terminals(terminals)
            .build()
    }

    #[test_log::test]
    fn cycles_of_different_length() {
        let two = cycle(2, [0]);
        let four = cycle(4, [0, 2]);
        let three = cycle(3, [0]);
        assert!(are_equivalent(&mut Bisimulation::new(&two, &four)));
        assert!(!are_equivalent(&mut Bisimulation::new(&two, &three)));
    }

    #[test]
    fn reflexive_and_symmetric() {
        let automaton = parse("(ab+a)*b").unwrap();
        let copy = automaton.clone();
        assert!(are_equivalent(&mut Bisimulation::new(&automaton, &automaton)));
        assert!(are_equivalent(&mut Bisimulation::new(&automaton, &copy)));

        let other = parse("a*b").unwrap();
        let forward = are_equivalent(&mut Bisimulation::new(&automaton, &other));
        let backward = are_equivalent(&mut Bisimulation::new(&other, &automaton));
        assert_eq!(forward, backward);
    }

    #[test]
    fn terminal_flags_matter() {
        let left = parse("a").unwrap();
        let right = parse("a+1").unwrap();
        assert!(!are_equivalent(&mut Bisimulation::new(&left, &right)));

        let mut relation = Bisimulation::new(&left, &right);
        let foreign = right.initials().into_iter().next().unwrap();
        let own = left.initials().into_iter().next().unwrap();
        assert!(!relation.equivalent(foreign, own));
    }
}
