use std::collections::BTreeSet;

/// Enumerates all finite words over an alphabet in length-lexicographic order, i.e. shorter
/// words come first and words of the same length are ordered lexicographically with respect to
/// the order of the labels.
///
/// ```
/// use rational_automata::prelude::*;
///
/// let words: Vec<String> = Words::up_to(['b', 'a'], 2)
///     .map(|word| word.into_iter().collect())
///     .collect();
/// assert_eq!(words, ["", "a", "b", "aa", "ab", "ba", "bb"]);
/// ```
#[derive(Debug, Clone)]
pub struct Words<L> {
    labels: Vec<L>,
    current: Option<Vec<usize>>,
    max_length: Option<usize>,
}

impl<L: Ord + Clone> Words<L> {
    /// Enumerates all words over the given labels, without any bound on their length. Duplicate
    /// labels are ignored.
    pub fn new<I: IntoIterator<Item = L>>(alphabet: I) -> Self {
        let labels: BTreeSet<L> = alphabet.into_iter().collect();
        Self {
            labels: labels.into_iter().collect(),
            current: Some(vec![]),
            max_length: None,
        }
    }

    /// Enumerates the words over the given labels that have at most `max_length` letters.
    pub fn up_to<I: IntoIterator<Item = L>>(alphabet: I, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..Self::new(alphabet)
        }
    }
}

impl<L: Clone> Iterator for Words<L> {
    type Item = Vec<L>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.as_mut()?;
        let word = current.iter().map(|&i| self.labels[i].clone()).collect();

        // increment like a number in base |labels|, growing by a digit on overflow
        let mut carry = true;
        for digit in current.iter_mut().rev() {
            *digit += 1;
            if *digit < self.labels.len() {
                carry = false;
                break;
            }
            *digit = 0;
        }
        if carry {
            let length = current.len() + 1;
            let exhausted =
                self.labels.is_empty() || self.max_length.is_some_and(|max| length > max);
            self.current = (!exhausted).then(|| vec![0; length]);
        }

        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::Words;

    #[test]
    fn length_lexicographic() {
        assert_eq!(
            Words::up_to(vec!['a', 'b'], 2).collect::<Vec<_>>(),
            vec![
                vec![],
                vec!['a'],
                vec!['b'],
                vec!['a', 'a'],
                vec!['a', 'b'],
                vec!['b', 'a'],
                vec!['b', 'b']
            ]
        );
        assert_eq!(Words::up_to(['x', 'y', 'z'], 3).count(), 1 + 3 + 9 + 27);
    }

    #[test]
    fn degenerate_alphabets() {
        assert_eq!(Words::<char>::new([]).collect::<Vec<_>>(), vec![vec![]]);
        assert_eq!(Words::up_to(['a'], 0).count(), 1);
        let unbounded: Vec<_> = Words::new(['a', 'a']).take(3).collect();
        assert_eq!(unbounded, vec![vec![], vec!['a'], vec!['a', 'a']]);
    }
}
