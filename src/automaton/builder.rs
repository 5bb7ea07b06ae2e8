use itertools::Itertools;

use super::{Automaton, State};
use crate::Label;

/// Fluent construction of an automaton through named states, which is started by calling
/// [`Automaton::from`]. Each call to [`Pending::go`] adds a transition and continues from its
/// target, which allows writing down paths in a single expression.
///
/// # Example
///
/// ```
/// use rational_automata::prelude::*;
///
/// let mut automaton = Automaton::new();
/// automaton.from("p").on('a').go("q").on('b').go("r");
/// automaton.from("q").epsilon().go("r");
/// automaton.initial("p");
/// automaton.terminal("r");
///
/// assert!(automaton.accept("ab".chars()));
/// assert!(automaton.accept("a".chars()));
/// ```
pub struct Fluent<'a, L> {
    automaton: &'a mut Automaton<L>,
    current: State,
}

/// A [`Fluent`] builder that has been given a label and waits for the target of the transition.
pub struct Pending<'a, L> {
    automaton: &'a mut Automaton<L>,
    current: State,
    label: Option<L>,
}

impl<'a, L: Label> Fluent<'a, L> {
    /// Prepares a transition on `label` from the current state.
    pub fn on(self, label: L) -> Pending<'a, L> {
        Pending {
            automaton: self.automaton,
            current: self.current,
            label: Some(label),
        }
    }

    /// Prepares an epsilon transition from the current state.
    pub fn epsilon(self) -> Pending<'a, L> {
        Pending {
            automaton: self.automaton,
            current: self.current,
            label: None,
        }
    }

    /// Returns the state the builder currently sits in.
    pub fn state(&self) -> State {
        self.current
    }
}

impl<'a, L: Label> Pending<'a, L> {
    /// Adds the pending transition to the state with the given name (creating it if necessary)
    /// and continues from there.
    pub fn go(self, name: &str) -> Fluent<'a, L> {
        let target = self.automaton.named_state(name);
        self.automaton.link(self.current, self.label, target);
        Fluent {
            automaton: self.automaton,
            current: target,
        }
    }
}

impl<L: Label> Automaton<L> {
    /// Starts a [`Fluent`] builder in the state with the given name.
    pub fn from(&mut self, name: &str) -> Fluent<'_, L> {
        let current = self.named_state(name);
        Fluent {
            automaton: self,
            current,
        }
    }

    /// Marks the state with the given name as initial, creating it if necessary.
    pub fn initial(&mut self, name: &str) -> State {
        let state = self.named_state(name);
        self.flags[state.index()].initial = true;
        state
    }

    /// Marks the state with the given name as terminal, creating it if necessary.
    pub fn terminal(&mut self, name: &str) -> State {
        let state = self.named_state(name);
        self.flags[state.index()].terminal = true;
        state
    }
}

/// Helper struct for the construction of automata from transitions between numbered states.
/// States are created for every number up to the largest one that is mentioned.
///
/// # Example
///
/// ```
/// use rational_automata::prelude::*;
///
/// let automaton = Automaton::builder()
///     .with_transitions([(0, Some('a'), 1), (1, Some('b'), 1), (1, None, 2)])
///     .with_initials([0])
///     .with_terminals([2])
///     .build();
/// assert_eq!(automaton.size(), 3);
/// assert!(automaton.accept("abbb".chars()));
/// ```
pub struct AutomatonBuilder<L> {
    transitions: Vec<(usize, Option<L>, usize)>,
    initials: Vec<usize>,
    terminals: Vec<usize>,
    states: usize,
}

impl<L> Default for AutomatonBuilder<L> {
    fn default() -> Self {
        Self {
            transitions: vec![],
            initials: vec![],
            terminals: vec![],
            states: 0,
        }
    }
}

impl<L: Label> AutomatonBuilder<L> {
    /// Ensures the built automaton has at least `count` states.
    pub fn with_states(mut self, count: usize) -> Self {
        self.states = self.states.max(count);
        self
    }

    /// Adds a list of transitions, given as triples of source, label and target.
    pub fn with_transitions<I, X>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (usize, X, usize)>,
        X: Into<Option<L>>,
    {
        self.transitions.extend(
            iter.into_iter()
                .map(|(source, label, target)| (source, label.into(), target)),
        );
        self
    }

    /// Marks the states with the given numbers as initial.
    pub fn with_initials<I: IntoIterator<Item = usize>>(mut self, iter: I) -> Self {
        self.initials.extend(iter);
        self
    }

    /// Marks the states with the given numbers as terminal.
    pub fn with_terminals<I: IntoIterator<Item = usize>>(mut self, iter: I) -> Self {
        self.terminals.extend(iter);
        self
    }

    /// Builds the automaton.
    pub fn build(self) -> Automaton<L> {
        let size = self
            .transitions
            .iter()
            .flat_map(|(source, _, target)| [*source, *target])
            .chain(self.initials.iter().copied())
            .chain(self.terminals.iter().copied())
            .map(|index| index + 1)
            .chain([self.states])
            .max()
            .unwrap_or(0);

        let mut automaton = Automaton::new();
        let states = (0..size)
            .map(|index| {
                automaton.add_state(
                    self.initials.contains(&index),
                    self.terminals.contains(&index),
                )
            })
            .collect_vec();
        for (source, label, target) in self.transitions {
            automaton.link(states[source], label, states[target]);
        }
        automaton
    }
}
