//! A relation is bound to two automata and decides whether states (or sets of states) of the
//! left automaton are related to states of the right one. The behavioral relations are decided
//! coinductively: a pair of states is assumed to be related while the obligations for its
//! successors are checked, which makes the recursion terminate on cyclic automata.

use tracing::debug;

use crate::{math::Set, Automaton, Label, Show, State, StateSet};

mod bisimulation;
pub use bisimulation::Bisimulation;

mod simulation;
pub use simulation::Simulation;

mod weak;
pub use weak::WeakBisimulation;

mod trace;
pub use trace::{LanguageEquivalence, TraceEquivalence};

mod model_check;
pub use model_check::ModelCheck;

/// A relation between the states of two automata, see the module documentation.
pub trait Relation<L: Label> {
    /// The automaton whose states appear on the left of the relation.
    fn left(&self) -> &Automaton<L>;

    /// The automaton whose states appear on the right of the relation.
    fn right(&self) -> &Automaton<L>;

    /// Decides whether the state `s` of the left automaton is related to the state `t` of the
    /// right automaton. States that do not belong to the respective automaton are never related.
    fn equivalent(&mut self, s: State, t: State) -> bool;

    /// Decides whether the set `s` of states of the left automaton is related to the set `t` of
    /// states of the right automaton.
    fn equivalent_sets(&mut self, s: &StateSet, t: &StateSet) -> bool;
}

/// Decides whether the initial states of the left automaton of `relation` are related to the
/// initial states of its right automaton.
///
/// ```
/// use rational_automata::prelude::*;
///
/// let left = parse("a(b+c)").unwrap();
/// let right = parse("ab+ac").unwrap();
/// assert!(are_equivalent(&mut TraceEquivalence::new(&left, &right)));
/// ```
pub fn are_equivalent<L, R>(relation: &mut R) -> bool
where
    L: Label,
    R: Relation<L> + ?Sized,
{
    let left = relation.left().initials();
    let right = relation.right().initials();
    relation.equivalent_sets(&left, &right)
}

/// The memo of a coinductive proof. A pair is assumed to be related as soon as its proof starts,
/// so that cycles close successfully. When the proof of a pair fails, every assumption that was
/// made since it was entered is withdrawn again, as those may have depended on it, and the pair
/// is remembered as refuted.
#[derive(Debug, Default)]
pub(crate) struct Assumptions {
    assumed: Set<(State, State)>,
    log: Vec<(State, State)>,
    refuted: Set<(State, State)>,
}

impl Assumptions {
    /// Proves the pair `(s, t)` by discharging `obligations` under the assumption that the pair
    /// itself is related.
    pub(crate) fn prove<F>(&mut self, s: State, t: State, obligations: F) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let pair = (s, t);
        if self.refuted.contains(&pair) {
            return false;
        }
        if self.assumed.contains(&pair) {
            return true;
        }

        let mark = self.log.len();
        self.assumed.insert(pair);
        self.log.push(pair);
        if obligations(self) {
            return true;
        }

        for withdrawn in self.log.drain(mark..) {
            self.assumed.remove(&withdrawn);
        }
        self.refuted.insert(pair);
        debug!("refuted {}", (s, t).show());
        false
    }

    /// Returns true if the pair is currently assumed to be related.
    #[cfg(test)]
    pub(crate) fn assumes(&self, s: State, t: State) -> bool {
        self.assumed.contains(&(s, t))
    }
}

#[cfg(test)]
mod tests {
    use super::Assumptions;
    use crate::prelude::*;

    #[test]
    fn failed_proofs_withdraw_dependent_assumptions() {
        let mut automaton: Automaton<char> = Automaton::new();
        let p = automaton.add_state(true, false);
        let q = automaton.add_state(false, false);

        let mut assumptions = Assumptions::default();
        // (p, p) depends on (q, q), which holds, and on (p, q), which fails after (q, q) was
        // entered
        let proven = assumptions.prove(p, p, |a| {
            a.prove(q, q, |_| true)
                && a.prove(p, q, |a| {
                    assert!(a.prove(p, p, |_| unreachable!()));
                    false
                })
        });
        assert!(!proven);
        assert!(!assumptions.assumes(p, p));
        assert!(!assumptions.assumes(q, q));
        assert!(!assumptions.prove(p, q, |_| true));

        assert!(assumptions.prove(q, p, |a| a.prove(q, p, |_| false)));
        assert!(assumptions.assumes(q, p));
    }
}
