use std::{
    borrow::Borrow,
    collections::{BTreeMap, BTreeSet},
    sync::atomic::{AtomicU64, Ordering},
};

use itertools::Itertools;
use thiserror::Error;
use tracing::trace;

use crate::{math::Bijection, Label, Show};

mod state;
pub(crate) use state::StateFlags;
pub use state::{State, StateSet};

mod transition;
pub use transition::Transition;

mod builder;
pub use builder::{AutomatonBuilder, Fluent, Pending};

/// Errors that can occur when manipulating the structure of an [`Automaton`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AutomatonError {
    /// The given state does not belong to the automaton, it was created by another one.
    #[error("state {0} does not belong to this automaton")]
    NoSuchState(State),
}

static NEXT_TAG: AtomicU64 = AtomicU64::new(0);

fn fresh_tag() -> u64 {
    NEXT_TAG.fetch_add(1, Ordering::Relaxed)
}

/// Maps each label (or `None` for epsilon) to the set of indices of adjacent states.
type Adjacency<L> = BTreeMap<Option<L>, BTreeSet<usize>>;

/// A finite automaton over labels of type `L`. It stores an arena of states, each of which may be
/// initial and/or terminal, and a set of transitions between them. Transitions are indexed both by
/// their start state and label (see [`Automaton::delta`]) and by their end state and label (see
/// [`Automaton::delta_inverse`]).
///
/// States are created through [`Automaton::add_state`] or [`Automaton::named_state`] and never
/// removed. Transformations never mutate an automaton, instead they build a new one.
///
/// # Example
///
/// ```
/// use rational_automata::prelude::*;
///
/// let mut automaton = Automaton::new();
/// let q0 = automaton.add_state(true, false);
/// let q1 = automaton.add_state(false, true);
/// automaton.add_edge(q0, Some('a'), q1).unwrap();
/// automaton.add_edge(q1, Some('b'), q1).unwrap();
///
/// assert!(automaton.accept("abb".chars()));
/// assert!(!automaton.accept("b".chars()));
/// ```
pub struct Automaton<L> {
    tag: u64,
    flags: Vec<StateFlags>,
    outgoing: Vec<Adjacency<L>>,
    incoming: Vec<Adjacency<L>>,
    names: Bijection<String, usize>,
    transition_count: usize,
}

impl<L> Default for Automaton<L> {
    fn default() -> Self {
        Self {
            tag: fresh_tag(),
            flags: vec![],
            outgoing: vec![],
            incoming: vec![],
            names: Bijection::new(),
            transition_count: 0,
        }
    }
}

impl<L> Automaton<L> {
    /// Creates a new automaton without any states.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiates a new [`AutomatonBuilder`], which allows building automata from a list of
    /// transitions between numbered states.
    pub fn builder() -> AutomatonBuilder<L> {
        AutomatonBuilder::default()
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.flags.len()
    }

    /// Returns true if the automaton has no states at all.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Returns the number of transitions.
    pub fn transition_count(&self) -> usize {
        self.transition_count
    }

    /// Returns an iterator over all states in the order of their creation.
    pub fn states(&self) -> impl ExactSizeIterator<Item = State> + '_ {
        let tag = self.tag;
        (0..self.flags.len()).map(move |index| State::new(tag, index))
    }

    /// Returns true if `state` belongs to `self`.
    pub fn contains(&self, state: State) -> bool {
        state.tag == self.tag && state.index() < self.flags.len()
    }

    pub(crate) fn locate(&self, state: State) -> Result<usize, AutomatonError> {
        if self.contains(state) {
            Ok(state.index())
        } else {
            Err(AutomatonError::NoSuchState(state))
        }
    }

    /// Produces the handle of the state with the given index.
    pub(crate) fn state(&self, index: usize) -> State {
        debug_assert!(index < self.flags.len());
        State::new(self.tag, index)
    }

    /// Returns the state of `self` that sits at the same position as the given `state` of some
    /// other automaton. This is only meaningful if `self` was derived from that automaton by a
    /// construction which preserves state indices.
    pub(crate) fn counterpart(&self, state: State) -> Option<State> {
        (state.index() < self.flags.len()).then(|| self.state(state.index()))
    }

    pub(crate) fn mark_initial(&mut self, state: State, initial: bool) {
        self.flags[state.index()].initial = initial;
    }

    pub(crate) fn mark_terminal(&mut self, state: State, terminal: bool) {
        self.flags[state.index()].terminal = terminal;
    }

    /// Adds a new state and returns its handle. Each call produces a fresh state.
    pub fn add_state(&mut self, initial: bool, terminal: bool) -> State {
        let index = self.flags.len();
        self.flags.push(StateFlags { initial, terminal });
        self.outgoing.push(BTreeMap::new());
        self.incoming.push(BTreeMap::new());
        State::new(self.tag, index)
    }

    /// Returns the state with the given `name`, creating a fresh non-initial and non-terminal
    /// state if no state of that name exists yet.
    pub fn named_state(&mut self, name: &str) -> State {
        if let Some(&index) = self.names.get_by_left(name) {
            return self.state(index);
        }
        let state = self.add_state(false, false);
        self.names.insert(name.to_string(), state.index());
        state
    }

    /// Looks up the state with the given `name` without creating it.
    pub fn state_named(&self, name: &str) -> Option<State> {
        self.names.get_by_left(name).map(|&index| self.state(index))
    }

    /// Returns the name of `state` if it was created by [`Automaton::named_state`].
    pub fn name_of(&self, state: State) -> Option<&str> {
        let index = self.locate(state).ok()?;
        self.names.get_by_right(&index).map(|name| name.as_str())
    }

    /// Sets whether `state` is initial.
    pub fn set_initial(&mut self, state: State, initial: bool) -> Result<(), AutomatonError> {
        let index = self.locate(state)?;
        self.flags[index].initial = initial;
        Ok(())
    }

    /// Sets whether `state` is terminal.
    pub fn set_terminal(&mut self, state: State, terminal: bool) -> Result<(), AutomatonError> {
        let index = self.locate(state)?;
        self.flags[index].terminal = terminal;
        Ok(())
    }

    /// Returns true if `state` belongs to `self` and is initial.
    pub fn is_initial(&self, state: State) -> bool {
        self.locate(state)
            .map(|index| self.flags[index].initial)
            .unwrap_or(false)
    }

    /// Returns true if `state` belongs to `self` and is terminal.
    pub fn is_terminal(&self, state: State) -> bool {
        self.locate(state)
            .map(|index| self.flags[index].terminal)
            .unwrap_or(false)
    }

    /// Returns the set of initial states.
    pub fn initials(&self) -> StateSet {
        self.states().filter(|q| self.flags[q.index()].initial).collect()
    }

    /// Returns the set of terminal states.
    pub fn terminals(&self) -> StateSet {
        self.states()
            .filter(|q| self.flags[q.index()].terminal)
            .collect()
    }
}

impl<L: Label> Automaton<L> {
    /// Adds the given transition. Returns `Ok(true)` if the transition was not present before and
    /// `Ok(false)` if it was. If one of the endpoints does not belong to `self`, an
    /// [`AutomatonError::NoSuchState`] is returned and `self` is left unchanged.
    pub fn add_transition<T: Into<Transition<L>>>(
        &mut self,
        transition: T,
    ) -> Result<bool, AutomatonError> {
        let Transition { start, label, end } = transition.into();
        let source = self.locate(start)?;
        let target = self.locate(end)?;

        let fresh = self.outgoing[source]
            .entry(label.clone())
            .or_default()
            .insert(target);
        if fresh {
            self.incoming[target].entry(label).or_default().insert(source);
            self.transition_count += 1;
        }
        Ok(fresh)
    }

    /// Convenience wrapper around [`Automaton::add_transition`].
    pub fn add_edge(
        &mut self,
        start: State,
        label: Option<L>,
        end: State,
    ) -> Result<bool, AutomatonError> {
        self.add_transition(Transition::new(start, label, end))
    }

    /// Adds a transition between two states that are known to belong to `self`.
    pub(crate) fn link(&mut self, start: State, label: Option<L>, end: State) {
        if let Err(e) = self.add_edge(start, label, end) {
            unreachable!("both endpoints were created by this automaton: {e}");
        }
    }

    /// Returns true if the transition is present in `self`.
    pub fn has_transition(&self, transition: &Transition<L>) -> bool {
        self.successors(transition.start, &transition.label)
            .any(|end| end == transition.end)
    }

    /// Returns an iterator over all transitions, ordered by start state and label.
    pub fn transitions(&self) -> impl Iterator<Item = Transition<L>> + '_ {
        self.states().flat_map(move |q| self.delta(q))
    }

    /// Returns all outgoing transitions of `state`. If `state` does not belong to `self`, the
    /// iterator is empty.
    pub fn delta(&self, state: State) -> impl Iterator<Item = Transition<L>> + '_ {
        let tag = self.tag;
        self.locate(state)
            .ok()
            .into_iter()
            .flat_map(move |index| {
                self.outgoing[index].iter().flat_map(move |(label, ends)| {
                    ends.iter().map(move |&end| {
                        Transition::new(state, label.clone(), State::new(tag, end))
                    })
                })
            })
    }

    /// Returns the outgoing transitions of `state` that are labeled with `label`.
    pub fn delta_on(
        &self,
        state: State,
        label: &Option<L>,
    ) -> impl Iterator<Item = Transition<L>> + '_ {
        let owned = label.clone();
        self.successors(state, label)
            .map(move |end| Transition::new(state, owned.clone(), end))
    }

    /// Returns all incoming transitions of `state`.
    pub fn delta_inverse(&self, state: State) -> impl Iterator<Item = Transition<L>> + '_ {
        let tag = self.tag;
        self.locate(state)
            .ok()
            .into_iter()
            .flat_map(move |index| {
                self.incoming[index].iter().flat_map(move |(label, starts)| {
                    starts.iter().map(move |&start| {
                        Transition::new(State::new(tag, start), label.clone(), state)
                    })
                })
            })
    }

    /// Returns the incoming transitions of `state` that are labeled with `label`.
    pub fn delta_inverse_on(
        &self,
        state: State,
        label: &Option<L>,
    ) -> impl Iterator<Item = Transition<L>> + '_ {
        let owned = label.clone();
        self.predecessors(state, label)
            .map(move |start| Transition::new(start, owned.clone(), state))
    }

    /// Returns the states that can be reached from `state` by a single transition on `label`.
    pub fn successors(&self, state: State, label: &Option<L>) -> impl Iterator<Item = State> + '_ {
        let tag = self.tag;
        self.locate(state)
            .ok()
            .and_then(|index| self.outgoing[index].get(label))
            .into_iter()
            .flatten()
            .map(move |&end| State::new(tag, end))
    }

    /// Returns the states from which `state` can be reached by a single transition on `label`.
    pub fn predecessors(
        &self,
        state: State,
        label: &Option<L>,
    ) -> impl Iterator<Item = State> + '_ {
        let tag = self.tag;
        self.locate(state)
            .ok()
            .and_then(|index| self.incoming[index].get(label))
            .into_iter()
            .flatten()
            .map(move |&start| State::new(tag, start))
    }

    /// Returns the labels (including `None` for epsilon) on which `state` has outgoing transitions.
    pub fn labels_from(&self, state: State) -> impl Iterator<Item = &Option<L>> + '_ {
        self.locate(state)
            .ok()
            .into_iter()
            .flat_map(move |index| self.outgoing[index].keys())
    }

    /// Computes the set of states reached from any state in `states` by reading `label`. Epsilon
    /// transitions are not followed, see [`Automaton::epsilon_closure`] for that.
    pub fn step(&self, states: &StateSet, label: &L) -> StateSet {
        let label = Some(label.clone());
        states
            .iter()
            .flat_map(|&q| self.successors(q, &label))
            .collect()
    }

    /// Returns the alphabet of `self`, which is the set of all labels that occur on some
    /// non-epsilon transition.
    pub fn alphabet(&self) -> BTreeSet<L> {
        self.outgoing
            .iter()
            .flat_map(|adjacency| adjacency.keys())
            .flatten()
            .cloned()
            .collect()
    }

    /// Returns true if `self` has no epsilon transitions.
    pub fn is_epsilon_free(&self) -> bool {
        self.outgoing
            .iter()
            .all(|adjacency| !adjacency.contains_key(&None))
    }

    /// Returns true if `self` has at most one initial state, no epsilon transitions and for every
    /// state and label at most one outgoing transition.
    pub fn is_deterministic(&self) -> bool {
        self.initials().len() <= 1
            && self.is_epsilon_free()
            && self
                .outgoing
                .iter()
                .all(|adjacency| adjacency.values().all(|ends| ends.len() <= 1))
    }

    /// Decides whether `word` is accepted. The set of current states starts out as the epsilon
    /// closure of the initial states and is then advanced symbol by symbol, taking the epsilon
    /// closure after each step. The word is accepted if the set of states that is eventually
    /// reached contains a terminal state.
    pub fn accept<W>(&self, word: W) -> bool
    where
        W: IntoIterator,
        W::Item: Borrow<L>,
    {
        let mut current = self.epsilon_closure(self.initials());
        for symbol in word {
            if current.is_empty() {
                break;
            }
            current = self.epsilon_closure(self.step(&current, symbol.borrow()));
        }
        trace!("run ended in {}", State::show_collection(current.iter()));
        current.iter().any(|&q| self.is_terminal(q))
    }

    /// Copies all states and transitions of `self` into `target`, keeping the initial and terminal
    /// flags. Returns the handles of the copies, where position `i` holds the copy of the state
    /// with index `i`.
    pub(crate) fn embed_into(&self, target: &mut Automaton<L>) -> Vec<State> {
        let copies = self
            .flags
            .iter()
            .map(|flags| target.add_state(flags.initial, flags.terminal))
            .collect_vec();
        for (source, adjacency) in self.outgoing.iter().enumerate() {
            for (label, ends) in adjacency {
                for &end in ends {
                    target.link(copies[source], label.clone(), copies[end]);
                }
            }
        }
        copies
    }

    /// Renders the transition table of `self`. Initial states are prefixed with `→`, terminal
    /// states are suffixed with `*`.
    pub fn table(&self) -> String {
        let mut columns: Vec<Option<L>> = vec![];
        if !self.is_epsilon_free() {
            columns.push(None);
        }
        columns.extend(self.alphabet().into_iter().map(Some));

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(columns.iter().map(|label| label.show())),
        );
        for q in self.states() {
            let mut row = vec![format!(
                "{}{}{}",
                if self.is_initial(q) { "→" } else { "" },
                self.name_of(q).map(str::to_string).unwrap_or_else(|| q.show()),
                if self.is_terminal(q) { "*" } else { "" }
            )];
            for label in &columns {
                let targets = self.successors(q, label).collect_vec();
                if targets.is_empty() {
                    row.push("-".to_string());
                } else {
                    row.push(State::show_collection(targets.iter()));
                }
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl<L: Clone> Clone for Automaton<L> {
    /// Creates a structural copy of `self`. The copy has the same topology, flags and names, but
    /// its states have fresh identities, so states of `self` can not be used with the copy.
    fn clone(&self) -> Self {
        Self {
            tag: fresh_tag(),
            flags: self.flags.clone(),
            outgoing: self.outgoing.clone(),
            incoming: self.incoming.clone(),
            names: self.names.clone(),
            transition_count: self.transition_count,
        }
    }
}

impl<L: Label> std::fmt::Debug for Automaton<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "automaton with {} states, initial {} and terminal {}",
            self.size(),
            State::show_collection(self.initials().iter()),
            State::show_collection(self.terminals().iter())
        )?;
        for transition in self.transitions() {
            writeln!(f, "  {}", transition.show())?;
        }
        Ok(())
    }
}
