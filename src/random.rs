//! Generation of random automata and words, which is mostly useful for testing and benchmarking.
//! All generators take an explicit [`fastrand::Rng`], so results can be reproduced from a seed.

use fastrand::Rng;
use tracing::debug;

use crate::{Automaton, Label};

/// Draws a random nondeterministic automaton with `size` states over the given `alphabet`.
/// Every possible transition on a label of the alphabet is present with probability `density`,
/// epsilon transitions with probability `density / 4`. The first state is always initial, every
/// other state is initial with probability `1 / size`, and states are terminal with probability
/// `1 / 3`.
pub fn generate_random_automaton<L: Label>(
    rng: &mut Rng,
    alphabet: &[L],
    size: usize,
    density: f64,
) -> Automaton<L> {
    let mut automaton = Automaton::new();
    let states: Vec<_> = (0..size)
        .map(|i| {
            let initial = i == 0 || rng.usize(..size) == 0;
            automaton.add_state(initial, rng.f64() < 1.0 / 3.0)
        })
        .collect();

    for &start in &states {
        for &end in &states {
            for label in alphabet {
                if rng.f64() < density {
                    automaton.link(start, Some(label.clone()), end);
                }
            }
            if rng.f64() < density / 4.0 {
                automaton.link(start, None, end);
            }
        }
    }
    debug!(
        "generated automaton with {} states and {} transitions",
        automaton.size(),
        automaton.transition_count()
    );
    automaton
}

/// Draws a random deterministic and complete automaton with `size` states over `alphabet`,
/// whose initial state is the first one. Every state is terminal with probability `1 / 2`.
pub fn generate_random_dfa<L: Label>(rng: &mut Rng, alphabet: &[L], size: usize) -> Automaton<L> {
    let mut automaton = Automaton::new();
    let states: Vec<_> = (0..size)
        .map(|i| automaton.add_state(i == 0, rng.bool()))
        .collect();
    for &start in &states {
        for label in alphabet {
            let end = states[rng.usize(..size)];
            automaton.link(start, Some(label.clone()), end);
        }
    }
    automaton
}

/// Draws a random word over `alphabet` whose length is chosen uniformly from
/// `min_length..=max_length`.
pub fn generate_random_word<L: Clone>(
    rng: &mut Rng,
    alphabet: &[L],
    min_length: usize,
    max_length: usize,
) -> Vec<L> {
    if alphabet.is_empty() {
        return vec![];
    }
    let length = rng.usize(min_length..=max_length);
    (0..length)
        .map(|_| alphabet[rng.usize(..alphabet.len())].clone())
        .collect()
}

/// Draws `count` random words, see [`generate_random_word`].
pub fn generate_random_words<L: Clone>(
    rng: &mut Rng,
    alphabet: &[L],
    min_length: usize,
    max_length: usize,
    count: usize,
) -> Vec<Vec<L>> {
    (0..count)
        .map(|_| generate_random_word(rng, alphabet, min_length, max_length))
        .collect()
}

#[cfg(test)]
mod tests {
    use fastrand::Rng;

    use super::*;
    use crate::{prelude::*, word::Words};

    const ALPHABET: [char; 2] = ['a', 'b'];

    fn samples() -> impl Iterator<Item = Automaton<char>> {
        let mut rng = Rng::with_seed(0xA170);
        (0..24).map(move |i| generate_random_automaton(&mut rng, &ALPHABET, 2 + i % 5, 0.3))
    }

    #[test_log::test]
    fn transformations_preserve_language() {
        for automaton in samples() {
            let dfa = automaton.to_dfa();
            let pruned = automaton.prune();
            let reduced = automaton.reduce();
            let free = automaton.remove_epsilon_transitions();
            let normalized = automaton.normalize();
            for word in Words::up_to(ALPHABET, 5) {
                let expected = automaton.accept(&word);
                assert_eq!(dfa.accept(&word), expected, "{automaton:?}");
                assert_eq!(pruned.accept(&word), expected, "{automaton:?}");
                assert_eq!(reduced.accept(&word), expected, "{automaton:?}");
                assert_eq!(free.accept(&word), expected, "{automaton:?}");
                assert_eq!(normalized.accept(&word), expected, "{automaton:?}");
            }
            assert_eq!(reduced.reduce().size(), reduced.size());
            assert_eq!(pruned.useful().len(), pruned.size());
        }
    }

    #[test_log::test]
    fn relations_on_random_automata() {
        for automaton in samples() {
            let copy = automaton.clone();
            assert!(are_equivalent(&mut Bisimulation::new(&automaton, &automaton)));
            assert!(are_equivalent(&mut Bisimulation::new(&automaton, &copy)));
            assert!(are_equivalent(&mut Bisimulation::new(&copy, &automaton)));
            assert!(are_equivalent(&mut WeakBisimulation::new(&automaton, &copy)));
            assert!(are_equivalent(&mut Simulation::new(&automaton, &copy)));

            let dfa = automaton.to_dfa();
            assert!(are_equivalent(&mut LanguageEquivalence::new(&automaton, &dfa)));
            assert!(ModelCheck::new(&automaton, &dfa).holds());
            assert!(ModelCheck::new(&dfa, &automaton).holds());
        }
    }

    #[test]
    fn round_trip_through_expressions() {
        for automaton in samples().take(8) {
            let expression = automaton.normalize().to_rexpression().unwrap();
            let reparsed = parse(&expression).unwrap();
            assert!(
                are_equivalent(&mut LanguageEquivalence::new(&automaton, &reparsed)),
                "{expression}"
            );
        }
    }

    #[test]
    fn random_dfas_are_deterministic() {
        let mut rng = Rng::with_seed(7);
        for size in 1..6 {
            let dfa = generate_random_dfa(&mut rng, &ALPHABET, size);
            assert!(dfa.is_deterministic());
            for word in generate_random_words(&mut rng, &ALPHABET, 0, 8, 10) {
                assert!(word.len() <= 8);
                assert_eq!(dfa.to_dfa().accept(&word), dfa.accept(&word));
            }
        }
    }
}
