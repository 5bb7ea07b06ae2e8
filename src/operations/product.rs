use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

use crate::{math::Map, Automaton, Label, State};

/// A synchronization policy determines how the transitions of two automata are combined in a
/// synchronized product (see [`Automaton::mix_with`]). Labels for which
/// [`Synchronization::synchronizes`] holds can never be taken by one component alone, instead a
/// pair of such labels (one from each component) is combined into a joint transition whenever
/// [`Synchronization::synchronize`] maps the pair to a label. All other labels interleave freely.
pub trait Synchronization<L> {
    /// Returns true if `label` is subject to synchronization, i.e. it may not be taken by one of
    /// the components alone.
    fn synchronizes(&self, label: &L) -> bool;

    /// Returns the label of the joint transition when the left component takes a transition
    /// labeled `left` and the right component one labeled `right` at the same time, or `None`
    /// if the two can not be taken together.
    fn synchronize(&self, left: &L, right: &L) -> Option<L>;
}

/// The default policy of [`Automaton::mix`]: all labels in a given set (usually the labels that are
/// shared by both alphabets) have to be taken by both components simultaneously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonLabels<L> {
    labels: BTreeSet<L>,
}

impl<L: Label> CommonLabels<L> {
    /// Synchronizes exactly on the given labels.
    pub fn new<I: IntoIterator<Item = L>>(labels: I) -> Self {
        Self {
            labels: labels.into_iter().collect(),
        }
    }

    /// Synchronizes on the labels that appear in the alphabets of both automata.
    pub fn of(left: &Automaton<L>, right: &Automaton<L>) -> Self {
        let right = right.alphabet();
        Self::new(left.alphabet().into_iter().filter(|l| right.contains(l)))
    }
}

impl<L: Label> Synchronization<L> for CommonLabels<L> {
    fn synchronizes(&self, label: &L) -> bool {
        self.labels.contains(label)
    }

    fn synchronize(&self, left: &L, right: &L) -> Option<L> {
        (left == right && self.labels.contains(left)).then(|| left.clone())
    }
}

/// Every label has to be taken by both components, which turns the synchronized product into
/// the classical product automaton for the intersection of two languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Synchronous;

impl<L: Label> Synchronization<L> for Synchronous {
    fn synchronizes(&self, _label: &L) -> bool {
        true
    }

    fn synchronize(&self, left: &L, right: &L) -> Option<L> {
        (left == right).then(|| left.clone())
    }
}

/// Synchronization given by an arbitrary partial function on pairs of labels, which is
/// consulted for the labels of a given synchronizing set.
pub struct PartialSynchronization<L, F> {
    labels: BTreeSet<L>,
    function: F,
}

impl<L: Label, F: Fn(&L, &L) -> Option<L>> PartialSynchronization<L, F> {
    /// Creates a policy under which the given `labels` synchronize, with joint labels computed by
    /// `function`.
    pub fn new<I: IntoIterator<Item = L>>(labels: I, function: F) -> Self {
        Self {
            labels: labels.into_iter().collect(),
            function,
        }
    }
}

impl<L: Label, F: Fn(&L, &L) -> Option<L>> Synchronization<L> for PartialSynchronization<L, F> {
    fn synchronizes(&self, label: &L) -> bool {
        self.labels.contains(label)
    }

    fn synchronize(&self, left: &L, right: &L) -> Option<L> {
        if self.synchronizes(left) && self.synchronizes(right) {
            (self.function)(left, right)
        } else {
            None
        }
    }
}

/// Explores the reachable part of a product of `left` and `right`. The product states are pairs of
/// states, a pair is initial if both components are initial and terminal if both are terminal.
/// The transitions leaving a pair are computed by `moves`.
fn explore<L, F>(left: &Automaton<L>, right: &Automaton<L>, moves: F) -> Automaton<L>
where
    L: Label,
    F: Fn(State, State) -> Vec<(Option<L>, State, State)>,
{
    let mut product = Automaton::new();
    let mut ids: Map<(State, State), State> = Map::default();
    let mut queue = VecDeque::new();

    for p in left.initials() {
        for q in right.initials() {
            let id = product.add_state(true, left.is_terminal(p) && right.is_terminal(q));
            ids.insert((p, q), id);
            queue.push_back((p, q));
        }
    }

    while let Some((p, q)) = queue.pop_front() {
        let source = ids[&(p, q)];
        for (label, next_left, next_right) in moves(p, q) {
            let target = *ids.entry((next_left, next_right)).or_insert_with(|| {
                queue.push_back((next_left, next_right));
                product.add_state(
                    false,
                    left.is_terminal(next_left) && right.is_terminal(next_right),
                )
            });
            product.link(source, label, target);
        }
    }

    debug!(
        "explored product of {} and {} states, yielding {} states and {} transitions",
        left.size(),
        right.size(),
        product.size(),
        product.transition_count()
    );
    product
}

impl<L: Label> Automaton<L> {
    /// Computes the shuffle of `self` and `other`, which accepts all interleavings of a word
    /// accepted by `self` with a word accepted by `other`. In every step, exactly one of the two
    /// components moves while the other one stays where it is, the alphabets are not coordinated
    /// in any way.
    pub fn shuffle(&self, other: &Self) -> Self {
        explore(self, other, |p, q| {
            self.delta(p)
                .map(|t| (t.label, t.end, q))
                .chain(other.delta(q).map(|t| (t.label, p, t.end)))
                .collect()
        })
    }

    /// Computes the synchronized product of `self` and `other`, where labels that occur in both
    /// alphabets have to be read by both components simultaneously, while all other labels
    /// interleave. See [`Automaton::mix_with`] for a version with a custom policy.
    pub fn mix(&self, other: &Self) -> Self {
        self.mix_with(other, &CommonLabels::of(self, other))
    }

    /// Computes the synchronized product of `self` and `other` under the given policy. Epsilon
    /// transitions and transitions on labels that do not synchronize are taken by one component
    /// alone, while synchronizing labels yield joint transitions as determined by the policy.
    pub fn mix_with<S: Synchronization<L>>(&self, other: &Self, synchronization: &S) -> Self {
        explore(self, other, |p, q| {
            let mut moves = vec![];
            let alone = |label: &Option<L>| {
                label
                    .as_ref()
                    .map_or(true, |label| !synchronization.synchronizes(label))
            };
            for t in self.delta(p).filter(|t| alone(&t.label)) {
                moves.push((t.label, t.end, q));
            }
            for t in other.delta(q).filter(|t| alone(&t.label)) {
                moves.push((t.label, p, t.end));
            }
            for t in self.delta(p) {
                let Some(left) = &t.label else { continue };
                for u in other.delta(q) {
                    let Some(right) = &u.label else { continue };
                    if let Some(joint) = synchronization.synchronize(left, right) {
                        moves.push((Some(joint), t.end, u.end));
                    }
                }
            }
            moves
        })
    }

    /// Computes the product automaton for the intersection of the languages of `self` and
    /// `other`, where every label has to be read by both components.
    pub fn intersection(&self, other: &Self) -> Self {
        self.mix_with(other, &Synchronous)
    }
}
