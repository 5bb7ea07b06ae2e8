use std::collections::BTreeMap;

use itertools::Itertools;

use crate::{Automaton, Label};

impl<L: Label> Automaton<L> {
    /// Applies the letter-to-letter morphism `morphism` to every transition label. Labels that are
    /// mapped to `None` are erased, the corresponding transitions become epsilon transitions. The
    /// result accepts the image of the language of `self` under the morphism.
    pub fn morphism<M, F>(&self, morphism: F) -> Automaton<M>
    where
        M: Label,
        F: Fn(&L) -> Option<M>,
    {
        let mut image = Automaton::new();
        let states = self
            .states()
            .map(|q| image.add_state(self.is_initial(q), self.is_terminal(q)))
            .collect_vec();
        for t in self.transitions() {
            let label = t.label.as_ref().and_then(&morphism);
            image.link(states[t.start.index()], label, states[t.end.index()]);
        }
        image
    }

    /// Computes an automaton over the labels in `domain` for the preimage of the language of
    /// `self` under `morphism`, that is it accepts a word `w` if and only if the image of `w`
    /// is accepted by `self`. A transition on `a` is replaced by parallel transitions on all labels
    /// of the domain that are mapped to `a`, and labels that are erased by the morphism may be
    /// read in every state without moving.
    pub fn inverse_morphism<K, I, F>(&self, domain: I, morphism: F) -> Automaton<K>
    where
        K: Label,
        I: IntoIterator<Item = K>,
        F: Fn(&K) -> Option<L>,
    {
        let mut preimages: BTreeMap<L, Vec<K>> = BTreeMap::new();
        let mut erased = vec![];
        for label in domain {
            match morphism(&label) {
                Some(image) => preimages.entry(image).or_default().push(label),
                None => erased.push(label),
            }
        }

        let mut preimage = Automaton::new();
        let states = self
            .states()
            .map(|q| preimage.add_state(self.is_initial(q), self.is_terminal(q)))
            .collect_vec();
        for t in self.transitions() {
            let (start, end) = (states[t.start.index()], states[t.end.index()]);
            match &t.label {
                None => preimage.link(start, None, end),
                Some(label) => {
                    for source in preimages.get(label).into_iter().flatten() {
                        preimage.link(start, Some(source.clone()), end);
                    }
                }
            }
        }
        for &q in &states {
            for label in &erased {
                preimage.link(q, Some(label.clone()), q);
            }
        }
        preimage
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, word::Words};

    #[test]
    fn morphism_relabels_and_erases() {
        let automaton = parse("ab*c").unwrap();
        let image = automaton.morphism(|l: &char| match l {
            'b' => None,
            other => Some(other.to_ascii_uppercase()),
        });
        assert!(image.accept("AC".chars()));
        assert!(!image.accept("ABC".chars()));
        assert!(!image.accept("A".chars()));

        let lengths = automaton.morphism(|_| Some(1u32));
        assert!(lengths.accept([1u32, 1, 1, 1]));
        assert!(!lengths.accept([1u32]));
    }

    #[test_log::test]
    fn inverse_morphism_computes_preimage() {
        // x and y both map to a, z is erased
        let morphism = |l: &char| match l {
            'x' | 'y' => Some('a'),
            'w' => Some('b'),
            _ => None,
        };
        let automaton = parse("a(ba)*").unwrap();
        let preimage = automaton.inverse_morphism(['w', 'x', 'y', 'z'], morphism);

        for word in Words::up_to(['w', 'x', 'y', 'z'], 5) {
            let image: Vec<char> = word.iter().filter_map(morphism).collect();
            assert_eq!(
                preimage.accept(&word),
                automaton.accept(&image),
                "{}",
                word.show()
            );
        }
        assert!(preimage.accept("zxzwy".chars()));
    }
}
