use itertools::Itertools;

use crate::{Automaton, Label, StateSet};

impl<L: Label> Automaton<L> {
    /// Removes all epsilon transitions from `self` while preserving the language. Whenever a state
    /// `q` reaches `p` via epsilon transitions and `p` has a transition on `a` to `r`, the result
    /// has a transition from `q` on `a` to `r`. A state becomes terminal if its epsilon closure
    /// contains a terminal state.
    ///
    /// The states of the result correspond one to one to those of `self`, the state with index `i`
    /// in the result stems from the state with index `i` in `self`.
    pub fn remove_epsilon_transitions(&self) -> Self {
        let closures: Vec<StateSet> = self.states().map(|q| self.epsilon_closure([q])).collect();

        let mut result = Automaton::new();
        let states = self
            .states()
            .map(|q| {
                let terminal = closures[q.index()].iter().any(|&p| self.is_terminal(p));
                result.add_state(self.is_initial(q), terminal)
            })
            .collect_vec();

        for q in self.states() {
            for &p in &closures[q.index()] {
                for t in self.delta(p).filter(|t| !t.is_epsilon()) {
                    result.link(states[q.index()], t.label, states[t.end.index()]);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, word::Words};

    #[test_log::test]
    fn epsilon_removal_preserves_language() {
        let automaton: Automaton<char> = Automaton::builder()
            .with_transitions([
                (0, None, 1),
                (1, Some('a'), 2),
                (2, None, 0),
                (2, None, 3),
                (3, Some('b'), 3),
            ])
            .with_initials([0])
            .with_terminals([3])
            .build();
        let free = automaton.remove_epsilon_transitions();

        assert!(free.is_epsilon_free());
        assert_eq!(free.size(), automaton.size());
        assert!(free.is_terminal(free.states().nth(2).unwrap()));
        for word in Words::up_to(['a', 'b'], 6) {
            assert_eq!(free.accept(&word), automaton.accept(&word), "{}", word.show());
        }
    }
}
