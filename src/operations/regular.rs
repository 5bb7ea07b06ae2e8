use itertools::Itertools;

use crate::{Automaton, Label};

impl<L: Label> Automaton<L> {
    /// Builds an automaton that accepts nothing.
    pub fn zero() -> Self {
        let mut automaton = Automaton::new();
        automaton.add_state(true, false);
        automaton
    }

    /// Builds an automaton that accepts only the empty word.
    pub fn one() -> Self {
        let mut automaton = Automaton::new();
        automaton.add_state(true, true);
        automaton
    }

    /// Builds an automaton that accepts exactly the word consisting of `label`.
    pub fn letter(label: L) -> Self {
        let mut automaton = Automaton::new();
        let start = automaton.add_state(true, false);
        let end = automaton.add_state(false, true);
        automaton.link(start, Some(label), end);
        automaton
    }

    /// Builds an automaton that accepts exactly the given word.
    pub fn word<W: IntoIterator<Item = L>>(word: W) -> Self {
        let mut automaton = Automaton::new();
        let mut current = automaton.add_state(true, false);
        for label in word {
            let next = automaton.add_state(false, false);
            automaton.link(current, Some(label), next);
            current = next;
        }
        automaton.mark_terminal(current, true);
        automaton
    }

    /// Computes an automaton for the union of the languages of `self` and `other`. The result
    /// consists of disjoint copies of both, keeping all initial and terminal states.
    pub fn union(&self, other: &Self) -> Self {
        let mut union = Automaton::new();
        self.embed_into(&mut union);
        other.embed_into(&mut union);
        union
    }

    /// Computes an automaton for the concatenation of the languages of `self` and `other`. Every
    /// terminal state of `self` is linked to every initial state of `other` with an epsilon
    /// transition, the initial states are those of `self` and the terminal states those of `other`.
    pub fn concatenation(&self, other: &Self) -> Self {
        let mut concatenation = Automaton::new();
        let left = self.embed_into(&mut concatenation);
        let right = other.embed_into(&mut concatenation);

        let ends = self.terminals().iter().map(|q| left[q.index()]).collect_vec();
        let starts = other.initials().iter().map(|q| right[q.index()]).collect_vec();
        for &end in &ends {
            concatenation.mark_terminal(end, false);
            for &start in &starts {
                concatenation.link(end, None, start);
            }
        }
        for &start in &starts {
            concatenation.mark_initial(start, false);
        }
        concatenation
    }

    /// Computes an automaton for the Kleene iteration of the language of `self`. A fresh state,
    /// which is both initial and terminal and has no incoming transitions, leads to the initial
    /// states of `self` and every terminal state loops back to the initial states via epsilon.
    pub fn star(&self) -> Self {
        let mut star = Automaton::new();
        let bridge = star.add_state(true, true);
        let copies = self.embed_into(&mut star);
        self.loop_back(&mut star, &copies);
        for q in self.initials() {
            star.mark_initial(copies[q.index()], false);
            star.link(bridge, None, copies[q.index()]);
        }
        star
    }

    /// Computes an automaton for the non-empty iteration `L(self)+` of the language of `self`,
    /// that is the concatenation of at least one word of `L(self)`.
    pub fn plus(&self) -> Self {
        let mut plus = Automaton::new();
        let copies = self.embed_into(&mut plus);
        self.loop_back(&mut plus, &copies);
        plus
    }

    fn loop_back(&self, target: &mut Automaton<L>, copies: &[crate::State]) {
        let initials = self.initials();
        for q in self.terminals() {
            for p in &initials {
                target.link(copies[q.index()], None, copies[p.index()]);
            }
        }
    }

    /// Computes an automaton accepting the concatenation of exactly `times` words of `self`.
    /// Repeating zero times yields an automaton that accepts only the empty word.
    pub fn repeat(&self, times: usize) -> Self {
        (0..times).fold(Automaton::one(), |acc, _| acc.concatenation(self))
    }
}
