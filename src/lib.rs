//! Library for working with finite automata over rational (regular) languages.
//!
//! An [`Automaton`] is an arena of states, some of which are marked initial and/or terminal,
//! together with a set of labeled transitions between them. A transition carries an `Option<L>` as
//! its label, where `None` denotes a silent epsilon move. States are addressed through opaque
//! [`State`] handles, which carry the identity of the automaton they belong to, so that mixing up
//! states of different automata is detected instead of silently producing garbage.
//!
//! Automata can be built by hand (see [`Automaton::add_state`], [`Automaton::from`] and
//! [`AutomatonBuilder`]), or parsed from a regular expression using [`parse`] or a [`Parser`] with
//! a custom [`Lexer`]. The inverse direction, turning an automaton back into an expression by
//! state elimination, is provided by [`Automaton::to_rexpression`].
//!
//! All transformations (union, concatenation, star, shuffle, the synchronized product `mix`,
//! complement, determinization, reduction, normalization, epsilon removal, pruning and (inverse)
//! morphisms) are pure: they take automata by reference and return a freshly built automaton, the
//! inputs are never touched. Behavioral relations between two automata (bisimulation, simulation,
//! trace equivalence) live in the [`relation`] module, together with a language containment check
//! [`ModelCheck`].
//!
//! ```
//! use rational_automata::prelude::*;
//!
//! let automaton = parse("ab*c").unwrap();
//! assert!(automaton.accept("abbc".chars()));
//! assert!(!automaton.accept("ab".chars()));
//! ```
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use rational_automata::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{
            Automaton, AutomatonBuilder, AutomatonError, Fluent, State, StateSet, Transition,
        },
        expression::{
            parse, CharLexer, ConverterError, Expression, Lexer, Parser, Token, WordLexer,
        },
        math,
        operations::{CommonLabels, PartialSynchronization, Synchronization, Synchronous},
        relation::{
            are_equivalent, Bisimulation, LanguageEquivalence, ModelCheck, Relation, Simulation,
            TraceEquivalence, WeakBisimulation,
        },
        word::Words,
        Label, Show,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the
/// crate and do not really fit to the top level.
pub mod math;

/// Defines the [`Automaton`] arena together with states, transitions and builders.
pub mod automaton;
pub use automaton::{Automaton, AutomatonBuilder, AutomatonError, State, StateSet, Transition};

/// Closures and reachability computations that the transformations are built from.
pub mod toolbox;

/// Language transformations, each of which builds a new automaton from one or two inputs.
pub mod operations;

/// Behavioral relations between the states of two automata.
pub mod relation;
pub use relation::{are_equivalent, ModelCheck, Relation};

/// Regular expressions: the expression type, lexers, the parser and state elimination.
pub mod expression;
pub use expression::{parse, ConverterError, Expression, Lexer, Parser};

/// Enumeration of finite words over an alphabet.
pub mod word;

/// Implements the generation of random automata.
#[cfg(feature = "random")]
pub mod random;

use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;

/// A label is the type of values that are read by transitions of an [`Automaton`]. Any
/// type with a proper equivalence relation and a total order can be used.
pub trait Label: Clone + Eq + Ord + Hash + Debug + Show {}

impl<T: Clone + Eq + Ord + Hash + Debug + Show> Label for T {}

/// Helper trait which can be used to display states, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state that should be
    /// for example q0, q1, q2, ... and for a transition (q0, a, q1) it should be (q0, a, q1).
    /// Just use something that makes sense. This is mainly used for debugging purposes and
    /// when printing expressions.
    fn show(&self) -> String;
    /// Show a collection of the thing, for a collection of states this should be {q0, q1, q2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for u32 {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl<S: Show> Show for Option<S> {
    fn show(&self) -> String {
        match self {
            None => "ε".to_string(),
            Some(x) => x.show(),
        }
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!("\"{}\"", self.iter().map(|x| x.show()).join(""))
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn word(w: &str) -> Vec<char> {
        w.chars().collect()
    }

    #[test_log::test]
    fn regex_scenario() {
        let automaton = parse("ab*c").unwrap();
        for accepted in ["ac", "abc", "abbbc"] {
            assert!(automaton.accept(word(accepted)), "{accepted} should be accepted");
        }
        for rejected in ["ab", "ca", "", "abcc"] {
            assert!(!automaton.accept(word(rejected)), "{rejected} should be rejected");
        }
    }

    #[test_log::test]
    fn mix_of_parsed_expressions_has_a_single_word() {
        let left = parse("ab*cd").unwrap();
        let right = parse("a*ebc").unwrap().prune();
        let mixed = left.mix(&right);

        assert!(mixed.accept(word("aebcd")));
        let expected = parse("aebcd").unwrap();
        assert!(ModelCheck::new(&expected, &mixed).holds());
        assert!(ModelCheck::new(&mixed, &expected).holds());
        assert!(are_equivalent(&mut LanguageEquivalence::new(&mixed, &expected)));
    }

    #[test_log::test]
    fn synchronized_cycles_meet_at_the_least_common_multiple() {
        let three = parse("a(bbb)^e").unwrap();
        let two = parse("a(bb)^e").unwrap();
        let joint = three.mix(&two);

        let shortest = joint.shortest_word().expect("joint language is not empty");
        assert_eq!(shortest, word("abbbbbbe"));
        for shorter in ["ae", "abbe", "abbbe", "abbbbe", "abbbbbbbe"] {
            assert!(!joint.accept(word(shorter)));
        }
        assert!(joint.accept(word("abbbbbbbbbbbbe")));

        // with plain iteration both sides may skip the cycle altogether
        let skipping = parse("a(bbb)*e").unwrap().mix(&parse("a(bb)*e").unwrap());
        assert_eq!(skipping.shortest_word(), Some(word("ae")));
    }

    #[test_log::test]
    fn branching_after_shared_prefix_is_not_bisimilar() {
        let mut left = Automaton::new();
        left.from("init").on('a').go("mid").on('b').go("t1");
        left.from("mid").on('c').go("t2");
        left.initial("init");
        left.terminal("t1");
        left.terminal("t2");

        let mut right = Automaton::new();
        right.from("init").on('a').go("s1").on('b').go("t1");
        right.from("init").on('a').go("s2").on('c').go("t2");
        right.initial("init");
        right.terminal("t1");
        right.terminal("t2");

        assert!(!are_equivalent(&mut Bisimulation::new(&left, &right)));
        assert!(are_equivalent(&mut TraceEquivalence::new(&left, &right)));
        assert!(are_equivalent(&mut Simulation::new(&right, &left)));
        assert!(!are_equivalent(&mut Simulation::new(&left, &right)));
    }

    #[test_log::test]
    fn duplicated_loops_are_trace_equivalent() {
        let mut left = Automaton::new();
        left.from("init").on('a').go("x").on('b').go("x");
        left.from("init").on('a').go("y").on('b').go("y");
        left.initial("init");
        left.terminal("x");
        left.terminal("y");

        let mut right = Automaton::new();
        right.from("init").on('a').go("z").on('b').go("z");
        right.initial("init");
        right.terminal("z");

        let mut traces = TraceEquivalence::new(&left, &right);
        assert!(are_equivalent(&mut traces));
        assert_eq!(traces.counterexample(), None);
        assert!(are_equivalent(&mut LanguageEquivalence::new(&left, &right)));
    }

    #[test]
    fn show_labels() {
        assert_eq!(Some('a').show(), "a");
        assert_eq!(None::<char>.show(), "ε");
        assert_eq!(vec!['a', 'b'].show(), "\"ab\"");
        assert_eq!(char::show_collection(['x', 'y'].iter()), "{x, y}");
    }
}
