use crate::{math::Map, Automaton, Label, State};

impl<L: Label> Automaton<L> {
    /// Removes all states that are not useful, i.e. that are either not reachable from an initial
    /// state or from which no terminal state can be reached, together with their transitions. Such
    /// states never lie on an accepting run, so the language is preserved.
    pub fn prune(&self) -> Self {
        let useful = self.useful();
        let mut pruned = Automaton::new();
        let copies: Map<State, State> = useful
            .iter()
            .map(|&q| (q, pruned.add_state(self.is_initial(q), self.is_terminal(q))))
            .collect();

        for t in self.transitions() {
            if let (Some(&start), Some(&end)) = (copies.get(&t.start), copies.get(&t.end)) {
                pruned.link(start, t.label, end);
            }
        }
        pruned
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, word::Words};

    #[test]
    fn pruning_keeps_only_useful_states() {
        let automaton: Automaton<char> = Automaton::builder()
            .with_transitions([
                (0, 'a', 1),
                (1, 'b', 2),
                (0, 'c', 3),
                (3, 'c', 3),
                (4, 'a', 2),
            ])
            .with_initials([0])
            .with_terminals([2])
            .build();
        let pruned = automaton.prune();

        assert_eq!(pruned.size(), 3);
        assert_eq!(pruned.useful().len(), pruned.size());
        assert_eq!(pruned.alphabet().into_iter().collect::<String>(), "ab");
        for word in Words::up_to(['a', 'b', 'c'], 4) {
            assert_eq!(pruned.accept(&word), automaton.accept(&word));
        }
    }

    #[test]
    fn pruning_an_empty_language() {
        let automaton: Automaton<char> = Automaton::zero();
        let pruned = automaton.prune();
        assert!(pruned.is_empty());
        assert!(!pruned.accept("".chars()));
    }
}
