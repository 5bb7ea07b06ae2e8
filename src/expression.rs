use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::{Automaton, Label, Show};

mod lexer;
pub use lexer::{CharLexer, Lexer, Token, WordLexer};

mod parser;
pub use parser::{parse, Parser, MAX_NESTING};

mod elimination;

/// Errors that occur while converting between expressions and automata.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConverterError {
    /// The parser encountered a token that does not fit the grammar.
    #[error("line {line}: unexpected {token}, expected {expected}")]
    Unexpected {
        /// The line on which the token starts.
        line: usize,
        /// A description of the offending token.
        token: String,
        /// What the parser would have accepted instead.
        expected: String,
    },
    /// The lexer encountered a character that can not start any token.
    #[error("line {line}: invalid character {character:?}")]
    Lexical {
        /// The line of the character.
        line: usize,
        /// The offending character.
        character: char,
    },
    /// State elimination was attempted on an automaton that is not normalized, see
    /// [`Automaton::normalize`].
    #[error("automaton is not normalized: {0}")]
    NotNormalized(String),
    /// A label has no spelling in the character syntax read by [`parse`], its text would be read
    /// back as an operator, a number, whitespace or more than one letter.
    #[error("label {0:?} can not be written as a letter")]
    Unrepresentable(String),
}

/// A regular expression over labels of type `L`.
///
/// Expressions are built with the simplifying constructors [`Expression::plus`],
/// [`Expression::product`] and [`Expression::star`], which apply the laws for `0` and `1` right
/// away, so that state elimination does not produce bloated results. They are displayed in the
/// syntax understood by the [`Parser`], using as few parentheses as possible. The alternate form
/// `{:#}` separates the factors of a product by spaces, which is what the [`WordLexer`] expects.
/// Letters are written as they are shown, without any escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression<L> {
    /// The empty language.
    Zero,
    /// The language containing only the empty word.
    One,
    /// A single label.
    Letter(L),
    /// Union.
    Plus(Box<Expression<L>>, Box<Expression<L>>),
    /// Concatenation.
    Product(Box<Expression<L>>, Box<Expression<L>>),
    /// Kleene iteration.
    Iteration(Box<Expression<L>>),
}

impl<L: Label> Expression<L> {
    /// Union of `self` and `other`, where `0` is neutral and duplicates collapse.
    pub fn plus(self, other: Self) -> Self {
        match (self, other) {
            (Expression::Zero, e) | (e, Expression::Zero) => e,
            (left, right) if left == right => left,
            (left, right) => Expression::Plus(Box::new(left), Box::new(right)),
        }
    }

    /// Concatenation of `self` and `other`, where `1` is neutral and `0` absorbs.
    pub fn product(self, other: Self) -> Self {
        match (self, other) {
            (Expression::Zero, _) | (_, Expression::Zero) => Expression::Zero,
            (Expression::One, e) | (e, Expression::One) => e,
            (left, right) => Expression::Product(Box::new(left), Box::new(right)),
        }
    }

    /// Iteration of `self`. Iterating `0` or `1` yields `1`, and iterating twice is the same as
    /// iterating once.
    pub fn star(self) -> Self {
        match self {
            Expression::Zero | Expression::One => Expression::One,
            iteration @ Expression::Iteration(_) => iteration,
            e => Expression::Iteration(Box::new(e)),
        }
    }

    /// Builds an automaton for the language of `self` from the regular operations on automata.
    pub fn to_automaton(&self) -> Automaton<L> {
        match self {
            Expression::Zero => Automaton::zero(),
            Expression::One => Automaton::one(),
            Expression::Letter(l) => Automaton::letter(l.clone()),
            Expression::Plus(left, right) => left.to_automaton().union(&right.to_automaton()),
            Expression::Product(left, right) => {
                left.to_automaton().concatenation(&right.to_automaton())
            }
            Expression::Iteration(inner) => inner.to_automaton().star(),
        }
    }
}

impl<L> Expression<L> {
    fn precedence(&self) -> u8 {
        match self {
            Expression::Plus(..) => 0,
            Expression::Product(..) => 1,
            Expression::Iteration(_) => 2,
            _ => 3,
        }
    }
}

impl<L: Show> Expression<L> {
    fn write_at(&self, f: &mut Formatter<'_>, minimum: u8) -> std::fmt::Result {
        if self.precedence() < minimum {
            write!(f, "(")?;
            self.write(f)?;
            write!(f, ")")
        } else {
            self.write(f)
        }
    }

    fn write(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Zero => write!(f, "0"),
            Expression::One => write!(f, "1"),
            Expression::Letter(l) => write!(f, "{}", l.show()),
            Expression::Plus(left, right) => {
                left.write_at(f, 0)?;
                write!(f, "+")?;
                right.write_at(f, 0)
            }
            Expression::Product(left, right) => {
                left.write_at(f, 1)?;
                if f.alternate() {
                    write!(f, " ")?;
                }
                right.write_at(f, 1)
            }
            Expression::Iteration(inner) => {
                inner.write_at(f, 3)?;
                write!(f, "*")
            }
        }
    }
}

impl<L: Show> Display for Expression<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.write(f)
    }
}

impl<L: Show> Show for Expression<L> {
    fn show(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Expression::{self, *};
    use crate::word::Words;

    fn letter(l: char) -> Expression<char> {
        Letter(l)
    }

    #[test]
    fn simplification() {
        assert_eq!(Zero.plus(letter('a')), letter('a'));
        assert_eq!(letter('a').plus(letter('a')), letter('a'));
        assert_eq!(One.product(letter('a')), letter('a'));
        assert_eq!(letter('a').product(Zero), Zero);
        assert_eq!(Zero::<char>.star(), One);
        assert_eq!(letter('a').star().star(), letter('a').star());
    }

    #[test]
    fn minimal_parentheses() {
        let e = letter('a')
            .plus(letter('b'))
            .product(letter('c').star())
            .plus(letter('d').product(letter('e')).star());
        assert_eq!(e.to_string(), "(a+b)c*+(de)*");
        assert_eq!(format!("{e:#}"), "(a+b) c*+(d e)*");
        assert_eq!(One.plus(letter('a')).to_string(), "1+a");
        assert_eq!(Expression::<char>::Zero.to_string(), "0");
    }

    #[test]
    fn automaton_of_expression() {
        let e = letter('a').plus(letter('b')).star().product(letter('c'));
        let automaton = e.to_automaton();
        for word in Words::up_to(['a', 'b', 'c'], 5) {
            let expected = word.last() == Some(&'c') && !word[..word.len() - 1].contains(&'c');
            assert_eq!(automaton.accept(&word), expected);
        }
    }
}
