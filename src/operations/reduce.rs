use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::debug;

use crate::{
    math::{Map, Partition},
    Automaton, Label, State,
};

/// The signature of a state consists of its class in the previous partition together with the
/// set of pairs of label and class of the successor.
type Signature<L> = (usize, BTreeSet<(Option<L>, usize)>);

impl<L: Label> Automaton<L> {
    /// Computes the coarsest partition of the states such that states in the same class agree on
    /// being terminal and for every label reach the same classes. This is done by signature
    /// refinement: starting from the split into terminal and non-terminal states, each state is
    /// assigned the set of (label, successor class) pairs it has, and states are separated if
    /// their signatures differ. This is repeated until the number of classes no longer grows.
    fn refine(&self) -> Vec<usize> {
        let mut classes = self
            .states()
            .map(|q| usize::from(self.is_terminal(q)))
            .collect_vec();
        let mut count = classes.iter().unique().count();
        let mut iteration = 0;

        loop {
            let mut ids: Map<Signature<L>, usize> = Map::default();
            let next = self
                .states()
                .map(|q| {
                    let signature = self
                        .delta(q)
                        .map(|t| (t.label, classes[t.end.index()]))
                        .collect::<BTreeSet<_>>();
                    let fresh = ids.len();
                    *ids.entry((classes[q.index()], signature)).or_insert(fresh)
                })
                .collect_vec();

            iteration += 1;
            debug!("iteration {iteration}, found {} classes", ids.len());
            debug_assert!(iteration <= self.size() + 1);

            let stable = ids.len() == count;
            count = ids.len();
            classes = next;
            if stable {
                return classes;
            }
        }
    }

    /// Returns the partition of the states of `self` computed by signature refinement, see
    /// [`Automaton::reduce`].
    pub fn bisimulation_partition(&self) -> Partition<State> {
        Partition::from_assignment(self.states(), &self.refine())
    }

    /// Reduces `self` by merging states that can not be distinguished: two states end up in the
    /// same class if both are terminal or both are not, and for every label their successors lie
    /// in the same classes. The result is the quotient under this partition, where a class is
    /// initial if one of its members is.
    ///
    /// The reduction preserves the language and is idempotent. For deterministic automata without
    /// unreachable states the result is the minimal automaton, for nondeterministic ones it is
    /// only guaranteed that no further merges of this kind are possible, a smaller automaton for
    /// the same language may still exist.
    pub fn reduce(&self) -> Self {
        let classes = self.refine();
        let count = classes.iter().max().map_or(0, |&max| max + 1);

        let mut reduced = Automaton::new();
        let states = (0..count)
            .map(|_| reduced.add_state(false, false))
            .collect_vec();
        for q in self.states() {
            let class = states[classes[q.index()]];
            if self.is_initial(q) {
                reduced.mark_initial(class, true);
            }
            if self.is_terminal(q) {
                reduced.mark_terminal(class, true);
            }
        }
        for t in self.transitions() {
            reduced.link(
                states[classes[t.start.index()]],
                t.label,
                states[classes[t.end.index()]],
            );
        }
        debug!("reduced {} states to {}", self.size(), reduced.size());
        reduced
    }
}

#[cfg(test)]
mod tests {
    use crate::{math::Partition, prelude::*, word::Words};

    #[test_log::test]
    fn reduction_merges_equivalent_states() {
        // two copies of the same b-loop behind an a
        let automaton: Automaton<char> = Automaton::builder()
            .with_transitions([(0, 'a', 1), (0, 'a', 2), (1, 'b', 1), (2, 'b', 2)])
            .with_initials([0])
            .with_terminals([1, 2])
            .build();
        let reduced = automaton.reduce();
        assert_eq!(reduced.size(), 2);
        let q: Vec<_> = automaton.states().collect();
        assert_eq!(
            automaton.bisimulation_partition(),
            Partition::new([vec![q[0]], vec![q[1], q[2]]])
        );
        for word in Words::up_to(['a', 'b'], 5) {
            assert_eq!(reduced.accept(&word), automaton.accept(&word));
        }
    }

    #[test_log::test]
    fn reduction_is_idempotent() {
        let automaton: Automaton<char> = Automaton::builder()
            .with_transitions([
                (0, Some('a'), 1),
                (0, Some('b'), 2),
                (1, Some('a'), 0),
                (1, Some('b'), 3),
                (2, Some('a'), 4),
                (2, Some('b'), 5),
                (3, Some('a'), 4),
                (3, Some('b'), 5),
                (4, Some('a'), 4),
                (4, Some('b'), 5),
                (5, Some('a'), 5),
                (5, Some('b'), 5),
                (5, None, 6),
            ])
            .with_initials([0])
            .with_terminals([2, 3, 4])
            .build();
        let once = automaton.reduce();
        let twice = once.reduce();
        // the dead states 5 and 6 are not merged, only pruning would remove them
        assert_eq!(once.size(), 4);
        assert_eq!(once.prune().reduce().size(), 2);
        assert_eq!(once.size(), twice.size());
        for word in Words::up_to(['a', 'b'], 6) {
            assert_eq!(once.accept(&word), automaton.accept(&word));
        }
    }

    #[test]
    fn empty_automaton() {
        let empty: Automaton<char> = Automaton::new();
        assert_eq!(empty.reduce().size(), 0);
    }
}
