use tracing::debug;

use crate::{Automaton, Label};

/// Checks whether an implementation only exhibits behavior that a specification allows, that is
/// whether the language of the implementation is contained in the language of the specification.
///
/// This is decided by building the product of the complement of the specification, taken over
/// the alphabet of the implementation, with the implementation itself. Every word accepted by
/// that product is a violation.
///
/// ```
/// use rational_automata::prelude::*;
///
/// let specification = parse("(a+b)*").unwrap();
/// let implementation = parse("ab*").unwrap();
/// assert!(ModelCheck::new(&specification, &implementation).holds());
///
/// let check = ModelCheck::new(&implementation, &specification);
/// assert!(!check.holds());
/// assert_eq!(check.witness(), Some(vec![]));
/// ```
pub struct ModelCheck<'a, L> {
    specification: &'a Automaton<L>,
    implementation: &'a Automaton<L>,
}

impl<'a, L: Label> ModelCheck<'a, L> {
    /// Prepares checking `implementation` against `specification`.
    pub fn new(specification: &'a Automaton<L>, implementation: &'a Automaton<L>) -> Self {
        Self {
            specification,
            implementation,
        }
    }

    /// Returns an automaton accepting exactly the words that the implementation accepts but the
    /// specification does not, or `None` if there are no such words. The automaton is pruned, so
    /// every state of it lies on a violating run.
    pub fn counterexample(&self) -> Option<Automaton<L>> {
        let forbidden = self
            .specification
            .complement_over(self.implementation.alphabet());
        let violations = forbidden.intersection(self.implementation).prune();
        debug!(
            "product of forbidden behavior has {} useful states",
            violations.size()
        );
        (!violations.is_empty()).then_some(violations)
    }

    /// Returns true if the language of the implementation is contained in that of the
    /// specification.
    pub fn holds(&self) -> bool {
        self.counterexample().is_none()
    }

    /// A shortest word accepted by the implementation but not by the specification.
    pub fn witness(&self) -> Option<Vec<L>> {
        self.counterexample()?.shortest_word()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn finds_violations() {
        let specification = parse("a*b").unwrap();
        let implementation = parse("a*b+ba").unwrap();
        let check = ModelCheck::new(&specification, &implementation);
        assert!(!check.holds());

        let violations = check.counterexample().unwrap();
        assert!(violations.accept("ba".chars()));
        assert!(!violations.accept("aab".chars()));
        assert_eq!(violations.useful().len(), violations.size());
        assert_eq!(check.witness(), Some(vec!['b', 'a']));
    }

    #[test]
    fn labels_unknown_to_the_specification_are_violations() {
        let specification = parse("a*").unwrap();
        let implementation = parse("aca").unwrap();
        assert_eq!(
            ModelCheck::new(&specification, &implementation).witness(),
            Some(vec!['a', 'c', 'a'])
        );
        assert!(ModelCheck::new(&implementation, &implementation).holds());
    }

    #[test]
    fn empty_implementation_always_holds() {
        let specification = parse("ab").unwrap();
        let nothing = parse("0").unwrap();
        assert!(ModelCheck::new(&specification, &nothing).holds());
        assert!(!ModelCheck::new(&nothing, &specification).holds());
    }
}
