use super::{Assumptions, Relation};
use crate::{Automaton, Label, State, StateSet};

/// The simulation preorder: a state `t` of the right automaton simulates a state `s` of the left
/// one if `t` is terminal whenever `s` is, and every transition of `s` can be answered by a
/// transition of `t` on the same label such that the targets are again in simulation. In
/// contrast to [`super::Bisimulation`] the right automaton may exhibit additional behavior.
pub struct Simulation<'a, L> {
    left: &'a Automaton<L>,
    right: &'a Automaton<L>,
    assumptions: Assumptions,
}

impl<'a, L: Label> Simulation<'a, L> {
    /// Creates the relation in which states of `left` are simulated by states of `right`.
    pub fn new(left: &'a Automaton<L>, right: &'a Automaton<L>) -> Self {
        Self {
            left,
            right,
            assumptions: Assumptions::default(),
        }
    }
}

fn simulated<L: Label>(
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
        (!left.is_terminal(s) || right.is_terminal(t))
            && left.delta(s).all(|step| {
                right
                    .successors(t, &step.label)
                    .any(|answer| simulated(left, right, assumptions, step.end, answer))
            })
    })
}

impl<'a, L: Label> Relation<L> for Simulation<'a, L> {
    fn left(&self) -> &Automaton<L> {
        self.left
    }

    fn right(&self) -> &Automaton<L> {
        self.right
    }

    fn equivalent(&mut self, s: State, t: State) -> bool {
        simulated(self.left, self.right, &mut self.assumptions, s, t)
    }

    /// Every state of `s` has to be simulated by some state of `t`.
    fn equivalent_sets(&mut self, s: &StateSet, t: &StateSet) -> bool {
        s.iter().all(|&p| t.iter().any(|&q| self.equivalent(p, q)))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn more_behavior_simulates_less() {
        let small = parse("ab").unwrap();
        let large = parse("a(b+c)").unwrap();
        assert!(are_equivalent(&mut Simulation::new(&small, &large)));
        assert!(!are_equivalent(&mut Simulation::new(&large, &small)));
    }

    #[test]
    fn mutual_simulation_is_weaker_than_bisimulation() {
        let mut left = Automaton::new();
        left.from("init").on('a').go("p").on('b').go("t");
        left.from("init").on('a').go("q").on('b').go("t");
        left.from("q").on('c').go("t");
        left.initial("init");
        left.terminal("t");

        let mut right = Automaton::new();
        right.from("init").on('a').go("q").on('b').go("t");
        right.from("q").on('c').go("t");
        right.initial("init");
        right.terminal("t");

        assert!(are_equivalent(&mut Simulation::new(&left, &right)));
        assert!(are_equivalent(&mut Simulation::new(&right, &left)));
        assert!(!are_equivalent(&mut Bisimulation::new(&left, &right)));
    }
}
