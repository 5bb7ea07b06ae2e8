use std::collections::{BTreeSet, VecDeque};

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{math::Map, Automaton, Label, Show, State, StateSet};

impl<L: Label> Automaton<L> {
    /// Returns true if one of the given states is terminal.
    fn meets_terminal(&self, states: &StateSet) -> bool {
        states.iter().any(|&q| self.is_terminal(q))
    }

    /// Determinizes `self` using the subset construction. The states of the result correspond to
    /// the epsilon closed sets of states of `self` that are reachable from the closure of the
    /// initial states, each such set is created only once, so the construction terminates with
    /// at most `2^n` states. A set is terminal if it contains a terminal state of `self`.
    ///
    /// The resulting automaton is deterministic but not necessarily complete, the empty set of
    /// states is never created. See [`Automaton::complement`] for a completed construction.
    pub fn to_dfa(&self) -> Self {
        let alphabet = self.alphabet();
        let mut dfa = Automaton::new();
        let mut subsets: Map<StateSet, State> = Map::default();
        let mut queue = VecDeque::new();

        let start = self.epsilon_closure(self.initials());
        let initial = dfa.add_state(true, self.meets_terminal(&start));
        subsets.insert(start.clone(), initial);
        queue.push_back(start);

        while let Some(subset) = queue.pop_front() {
            let source = subsets[&subset];
            for label in &alphabet {
                let next = self.epsilon_closure(self.step(&subset, label));
                if next.is_empty() {
                    continue;
                }
                let target = match subsets.get(&next) {
                    Some(&target) => target,
                    None => {
                        let target = dfa.add_state(false, self.meets_terminal(&next));
                        trace!(
                            "subset {} becomes {}",
                            State::show_collection(next.iter()),
                            target.show()
                        );
                        subsets.insert(next.clone(), target);
                        queue.push_back(next);
                        target
                    }
                };
                dfa.link(source, Some(label.clone()), target);
            }
        }

        debug!(
            "subset construction turned {} states into {}",
            self.size(),
            dfa.size()
        );
        dfa
    }

    /// Computes an automaton for the complement of the language of `self` with respect to the
    /// words over the alphabet of `self`. See [`Automaton::complement_over`].
    pub fn complement(&self) -> Self {
        self.complement_over(self.alphabet())
    }

    /// Computes an automaton for the complement of the language of `self` with respect to all
    /// words over `universe`. The automaton is first determinized, transitions on labels outside
    /// of the universe are dropped, and missing transitions are directed into a sink state. Then
    /// the terminal flags are flipped.
    pub fn complement_over<I: IntoIterator<Item = L>>(&self, universe: I) -> Self {
        let universe: BTreeSet<L> = universe.into_iter().collect();
        let dfa = self.to_dfa();

        let mut complement = Automaton::new();
        let states = dfa
            .states()
            .map(|q| complement.add_state(dfa.is_initial(q), !dfa.is_terminal(q)))
            .collect_vec();

        let mut sink = None;
        for q in dfa.states() {
            for label in &universe {
                let symbol = Some(label.clone());
                match dfa.successors(q, &symbol).next() {
                    Some(p) => complement.link(states[q.index()], symbol, states[p.index()]),
                    None => {
                        let sink = *sink.get_or_insert_with(|| complement.add_state(false, true));
                        complement.link(states[q.index()], symbol, sink);
                    }
                }
            }
        }
        if let Some(sink) = sink {
            for label in &universe {
                complement.link(sink, Some(label.clone()), sink);
            }
        }
        complement
    }
}
