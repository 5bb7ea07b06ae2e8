use crate::{Automaton, Label, State};

impl<L: Label> Automaton<L> {
    /// Normalizes `self` by adding a fresh initial state, which leads to all former initial states
    /// via epsilon transitions, and a fresh terminal state, which is reached from all former
    /// terminal states via epsilon. The result has exactly one initial state without incoming
    /// transitions and exactly one terminal state without outgoing transitions, which is what
    /// [`Automaton::to_expression`] expects.
    pub fn normalize(&self) -> Self {
        let mut normalized = Automaton::new();
        let start = normalized.add_state(true, false);
        let copies = self.embed_into(&mut normalized);
        let end = normalized.add_state(false, true);

        for q in self.initials() {
            let copy = copies[q.index()];
            normalized.mark_initial(copy, false);
            normalized.link(start, None, copy);
        }
        for q in self.terminals() {
            let copy = copies[q.index()];
            normalized.mark_terminal(copy, false);
            normalized.link(copy, None, end);
        }
        normalized
    }

    /// Checks whether `self` is normalized, in which case the unique initial and terminal state
    /// are returned. Otherwise the reason why `self` is not normalized is given.
    pub fn normalized_endpoints(&self) -> Result<(State, State), String> {
        let initials = self.initials();
        let terminals = self.terminals();
        let (Some(&initial), 1) = (initials.first(), initials.len()) else {
            return Err(format!("expected one initial state, found {}", initials.len()));
        };
        let (Some(&terminal), 1) = (terminals.first(), terminals.len()) else {
            return Err(format!("expected one terminal state, found {}", terminals.len()));
        };
        if initial == terminal {
            return Err(format!("{initial} is both initial and terminal"));
        }
        if self.delta_inverse(initial).next().is_some() {
            return Err(format!("initial state {initial} has incoming transitions"));
        }
        if self.delta(terminal).next().is_some() {
            return Err(format!("terminal state {terminal} has outgoing transitions"));
        }
        Ok((initial, terminal))
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, word::Words};

    #[test]
    fn normalization_preserves_language() {
        let automaton = parse("a*+b(ab)*").unwrap();
        assert!(automaton.normalized_endpoints().is_err());

        let normalized = automaton.normalize();
        let (initial, terminal) = normalized.normalized_endpoints().unwrap();
        assert!(normalized.is_initial(initial));
        assert!(normalized.is_terminal(terminal));
        for word in Words::up_to(['a', 'b'], 6) {
            assert_eq!(normalized.accept(&word), automaton.accept(&word));
        }
    }

    #[test]
    fn violations_are_explained() {
        let looping: Automaton<char> = Automaton::builder()
            .with_transitions([(0, 'a', 1), (1, 'a', 0)])
            .with_initials([0])
            .with_terminals([1])
            .build();
        let reason = looping.normalized_endpoints().unwrap_err();
        assert!(reason.contains("incoming"), "{reason}");

        let shared: Automaton<char> = Automaton::one();
        assert!(shared
            .normalized_endpoints()
            .unwrap_err()
            .contains("both initial and terminal"));
    }
}
