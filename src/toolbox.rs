use std::collections::VecDeque;

use bit_set::BitSet;
use tracing::trace;

use crate::{Automaton, Label, Show, State, StateSet};

impl<L: Label> Automaton<L> {
    /// Computes the epsilon closure of the given states, that is the set of all states that can be
    /// reached from one of them using only epsilon transitions (including the states themselves).
    /// States that do not belong to `self` are ignored.
    pub fn epsilon_closure<I: IntoIterator<Item = State>>(&self, states: I) -> StateSet {
        let mut closure = StateSet::new();
        let mut stack: Vec<State> = states.into_iter().filter(|q| self.contains(*q)).collect();
        while let Some(q) = stack.pop() {
            if closure.insert(q) {
                stack.extend(self.successors(q, &None).filter(|p| !closure.contains(p)));
            }
        }
        closure
    }

    /// Returns the states that are reachable from some initial state.
    pub fn accessible(&self) -> StateSet {
        self.search(self.initials(), |q| {
            self.labels_from(q)
                .flat_map(|label| self.successors(q, label))
                .collect()
        })
    }

    /// Returns the states from which some terminal state can be reached.
    pub fn co_accessible(&self) -> StateSet {
        self.search(self.terminals(), |q| {
            self.delta_inverse(q).map(|t| t.start).collect()
        })
    }

    /// Returns the states that are both accessible and co-accessible. Only these states can lie on
    /// an accepting run.
    pub fn useful(&self) -> StateSet {
        let co_accessible = self.co_accessible();
        self.accessible()
            .into_iter()
            .filter(|q| co_accessible.contains(q))
            .collect()
    }

    fn search<F>(&self, origin: StateSet, neighbours: F) -> StateSet
    where
        F: Fn(State) -> Vec<State>,
    {
        let mut seen = BitSet::with_capacity(self.size());
        let mut queue: VecDeque<State> = origin.into_iter().collect();
        for q in &queue {
            seen.insert(q.index());
        }
        let mut found = StateSet::new();
        while let Some(q) = queue.pop_front() {
            found.insert(q);
            for p in neighbours(q) {
                if seen.insert(p.index()) {
                    queue.push_back(p);
                }
            }
        }
        found
    }

    /// Returns a shortest word accepted by `self`, or `None` if the accepted language is empty.
    /// Among the accepted words of minimal length, the one that is found first in a breadth first
    /// search ordered by labels is returned.
    pub fn shortest_word(&self) -> Option<Vec<L>> {
        // 0-1 BFS: epsilon moves cost nothing and are explored first.
        let mut distance = vec![usize::MAX; self.size()];
        let mut parent: Vec<Option<(State, Option<L>)>> = vec![None; self.size()];
        let mut queue = VecDeque::new();
        for q in self.initials() {
            distance[q.index()] = 0;
            queue.push_back(q);
        }

        let mut settled = BitSet::with_capacity(self.size());
        let mut reached = None;
        while let Some(q) = queue.pop_front() {
            if !settled.insert(q.index()) {
                continue;
            }
            if self.is_terminal(q) {
                reached = Some(q);
                break;
            }
            for transition in self.delta(q) {
                let cost = usize::from(transition.label.is_some());
                let candidate = distance[q.index()] + cost;
                let end = transition.end.index();
                if candidate < distance[end] {
                    distance[end] = candidate;
                    parent[end] = Some((q, transition.label));
                    if cost == 0 {
                        queue.push_front(transition.end);
                    } else {
                        queue.push_back(transition.end);
                    }
                }
            }
        }

        let mut current = reached?;
        let mut word = vec![];
        while let Some((previous, label)) = parent[current.index()].clone() {
            word.extend(label);
            current = previous;
        }
        word.reverse();
        trace!("found shortest word {}", word.show());
        Some(word)
    }

    /// Returns true if `self` accepts no word at all.
    pub fn is_empty_language(&self) -> bool {
        let accessible = self.accessible();
        accessible.iter().all(|&q| !self.is_terminal(q))
    }
}
