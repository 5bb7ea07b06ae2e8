use super::{bisimulation::bisimilar, Assumptions, Relation};
use crate::{Automaton, Label, State, StateSet};

/// Bisimulation up to silent moves. Both automata are freed of epsilon transitions first, and
/// strong bisimulation is then decided on the results. States are given as states of the
/// original automata, which works because epsilon removal keeps the positions of all states.
pub struct WeakBisimulation<'a, L> {
    left: &'a Automaton<L>,
    right: &'a Automaton<L>,
    silent_free: (Automaton<L>, Automaton<L>),
    assumptions: Assumptions,
}

impl<'a, L: Label> WeakBisimulation<'a, L> {
    /// Binds the relation to the given automata.
    pub fn new(left: &'a Automaton<L>, right: &'a Automaton<L>) -> Self {
        Self {
            left,
            right,
            silent_free: (
                left.remove_epsilon_transitions(),
                right.remove_epsilon_transitions(),
            ),
            assumptions: Assumptions::default(),
        }
    }

    fn translate(&self, s: State, t: State) -> Option<(State, State)> {
        if !self.left.contains(s) || !self.right.contains(t) {
            return None;
        }
        Some((
            self.silent_free.0.counterpart(s)?,
            self.silent_free.1.counterpart(t)?,
        ))
    }
}

impl<'a, L: Label> Relation<L> for WeakBisimulation<'a, L> {
    fn left(&self) -> &Automaton<L> {
        self.left
    }

    fn right(&self) -> &Automaton<L> {
        self.right
    }

    fn equivalent(&mut self, s: State, t: State) -> bool {
        let Some((s, t)) = self.translate(s, t) else {
            return false;
        };
        let (left, right) = &self.silent_free;
        bisimilar(left, right, &mut self.assumptions, s, t)
    }

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

    #[test_log::test]
    fn silent_moves_are_ignored() {
        let mut silent = Automaton::new();
        silent.from("p").epsilon().go("q").on('a').go("r").epsilon().go("s");
        silent.from("s").on('b').go("t");
        silent.initial("p");
        silent.terminal("t");

        let mut direct = Automaton::new();
        direct.from("p").on('a').go("r").on('b').go("t");
        direct.initial("p");
        direct.terminal("t");

        assert!(!are_equivalent(&mut Bisimulation::new(&silent, &direct)));
        assert!(are_equivalent(&mut WeakBisimulation::new(&silent, &direct)));

        let mut relation = WeakBisimulation::new(&silent, &direct);
        let r = silent.state_named("r").unwrap();
        let target = direct.state_named("r").unwrap();
        assert!(relation.equivalent(r, target));
        assert!(!relation.equivalent(target, r));
    }

    #[test]
    fn choices_still_matter() {
        let early = parse("a(b+c)").unwrap();
        let swapped = parse("a(c+b)").unwrap();
        assert!(are_equivalent(&mut WeakBisimulation::new(&early, &swapped)));

        let mut split = Automaton::new();
        split.from("i").epsilon().go("x").on('a').go("y").on('b').go("z");
        split.from("i").epsilon().go("u").on('a').go("v").on('c').go("z");
        split.initial("i");
        split.terminal("z");
        assert!(!are_equivalent(&mut WeakBisimulation::new(&split, &early)));
    }
}
