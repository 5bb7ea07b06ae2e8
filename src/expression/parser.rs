use tracing::trace;

use super::{CharLexer, ConverterError, Lexer, Token};
use crate::{Automaton, Label, Show};

/// A recursive descent parser that turns an expression into an automaton. The grammar is, from
/// the weakest to the strongest binding:
///
/// ```text
/// expression := mixed ('+' mixed)*
/// mixed      := product (('#' | '|') product)*
/// product    := postfix postfix*
/// postfix    := atom ('*' | '^' | number)*
/// atom       := letter | '0' | '1' | '(' expression ')'
/// ```
///
/// Here `#` is the synchronized product [`Automaton::mix`], `|` the shuffle
/// [`Automaton::shuffle`], `^` iteration with at least one repetition and a number `n` behind an
/// atom repeats it exactly `n` times. Note that a number directly behind an atom is always read as
/// a repetition, `a1` is the same as `a`, and `(a)(1)` concatenates with the empty word.
///
/// Every production builds its automaton from those of its parts with the operations of this
/// crate, and immediately canonicalizes the result by removing epsilon transitions, pruning and
/// reducing, which keeps the automata small.
///
/// ```
/// use rational_automata::prelude::*;
///
/// let automaton = Parser::new(CharLexer::new("(ab)2 | c")).parse().unwrap();
/// assert!(automaton.accept("abcab".chars()));
/// assert!(!automaton.accept("abab".chars()));
/// ```
pub struct Parser<L, X> {
    lexer: X,
    lookahead: Option<(Token<L>, usize)>,
    depth: usize,
}

/// What may start an atom, used in error messages.
const ATOM: &str = "a letter, 0, 1 or '('";

/// Deepest nesting of parentheses the parser descends into.
pub const MAX_NESTING: usize = 100;

fn canonical<L: Label>(automaton: Automaton<L>) -> Automaton<L> {
    automaton.remove_epsilon_transitions().prune().reduce()
}

impl<L: Label, X: Lexer<L>> Parser<L, X> {
    /// Creates a parser reading tokens from `lexer`.
    pub fn new(lexer: X) -> Self {
        Self {
            lexer,
            lookahead: None,
            depth: 0,
        }
    }

    /// Parses the whole input into an automaton. Fails with a [`ConverterError`] that carries the
    /// line of the offending token if the input is malformed, or if parentheses are nested deeper
    /// than [`MAX_NESTING`].
    pub fn parse(mut self) -> Result<Automaton<L>, ConverterError> {
        let automaton = self.expression()?;
        match self.advance()? {
            (Token::End, _) => Ok(automaton),
            (token, line) => Err(Self::unexpected(token, line, "an operator or end of input")),
        }
    }

    fn peek(&mut self) -> Result<&Token<L>, ConverterError> {
        let next = match &mut self.lookahead {
            Some(next) => next,
            empty => empty.insert(self.lexer.next_token()?),
        };
        Ok(&next.0)
    }

    fn advance(&mut self) -> Result<(Token<L>, usize), ConverterError> {
        match self.lookahead.take() {
            Some(next) => Ok(next),
            None => self.lexer.next_token(),
        }
    }

    fn unexpected(token: Token<L>, line: usize, expected: &str) -> ConverterError {
        ConverterError::Unexpected {
            line,
            token: token.show(),
            expected: expected.to_string(),
        }
    }

    fn expression(&mut self) -> Result<Automaton<L>, ConverterError> {
        let mut automaton = self.mixed()?;
        while self.peek()? == &Token::Plus {
            self.advance()?;
            let right = self.mixed()?;
            trace!("union");
            automaton = canonical(automaton.union(&right));
        }
        Ok(automaton)
    }

    fn mixed(&mut self) -> Result<Automaton<L>, ConverterError> {
        let mut automaton = self.product()?;
        loop {
            let mix = match self.peek()? {
                Token::Mix => true,
                Token::Shuffle => false,
                _ => return Ok(automaton),
            };
            self.advance()?;
            let right = self.product()?;
            automaton = if mix {
                trace!("mix");
                canonical(automaton.mix(&right))
            } else {
                trace!("shuffle");
                canonical(automaton.shuffle(&right))
            };
        }
    }

    fn product(&mut self) -> Result<Automaton<L>, ConverterError> {
        let mut automaton = self.postfix()?;
        while matches!(self.peek()?, Token::Letter(_) | Token::LeftParen) {
            let right = self.postfix()?;
            trace!("concatenation");
            automaton = canonical(automaton.concatenation(&right));
        }
        Ok(automaton)
    }

    fn postfix(&mut self) -> Result<Automaton<L>, ConverterError> {
        let mut automaton = self.atom()?;
        loop {
            automaton = match self.peek()? {
                Token::Star => canonical(automaton.star()),
                Token::Caret => canonical(automaton.plus()),
                &Token::Integer(times) => canonical(automaton.repeat(times)),
                _ => return Ok(automaton),
            };
            self.advance()?;
        }
    }

    fn atom(&mut self) -> Result<Automaton<L>, ConverterError> {
        match self.advance()? {
            (Token::Letter(l), _) => {
                trace!("letter {}", l.show());
                Ok(Automaton::letter(l))
            }
            (Token::Integer(0), _) => Ok(canonical(Automaton::zero())),
            (Token::Integer(1), _) => Ok(Automaton::one()),
            (Token::LeftParen, line) => {
                if self.depth == MAX_NESTING {
                    let expected = format!("at most {MAX_NESTING} nested parentheses");
                    return Err(Self::unexpected(Token::LeftParen, line, &expected));
                }
                self.depth += 1;
                let automaton = self.expression()?;
                self.depth -= 1;
                match self.advance()? {
                    (Token::RightParen, _) => Ok(automaton),
                    (token, line) => Err(Self::unexpected(token, line, "')'")),
                }
            }
            (token, line) => Err(Self::unexpected(token, line, ATOM)),
        }
    }
}

/// Parses an expression over characters, see [`Parser`] for the syntax.
///
/// ```
/// use rational_automata::prelude::*;
///
/// assert!(parse("(a+b)*c").unwrap().accept("abbac".chars()));
/// assert!(parse("a+").is_err());
/// ```
pub fn parse(text: &str) -> Result<Automaton<char>, ConverterError> {
    Parser::new(CharLexer::new(text)).parse()
}

#[cfg(test)]
mod tests {
    use super::MAX_NESTING;
    use crate::{prelude::*, word::Words};

    fn check(expression: &str, accepted: impl Fn(&[char]) -> bool) {
        let automaton = parse(expression).unwrap();
        for word in Words::up_to(['a', 'b', 'c'], 6) {
            assert_eq!(
                automaton.accept(&word),
                accepted(&word),
                "{expression} on {}",
                word.show()
            );
        }
    }

    #[test_log::test]
    fn precedence() {
        check("ab+c", |w| w == ['a', 'b'] || w == ['c']);
        check("a(b+c)", |w| w == ['a', 'b'] || w == ['a', 'c']);
        check("ab*", |w| w.first() == Some(&'a') && w[1..].iter().all(|&l| l == 'b'));
        check("(ab)*", |w| w.len() % 2 == 0 && w.chunks(2).all(|c| c == ['a', 'b']));
        check("a^", |w| !w.is_empty() && w.iter().all(|&l| l == 'a'));
        check("a3+b", |w| w == ['a', 'a', 'a'] || w == ['b']);
        check("a0", |w| w.is_empty());
        check("0", |_| false);
        check("1", |w| w.is_empty());
        check("a+0b", |w| w == ['a']);
    }

    #[test_log::test]
    fn interleaving_operators() {
        check("ab|c", |w| {
            let mut sorted = w.to_vec();
            sorted.sort();
            let position = |letter| w.iter().position(|&l| l == letter);
            sorted == ['a', 'b', 'c'] && position('a') < position('b')
        });
        // a and b are shared and have to move together, c interleaves
        check("ab#cab", |w| w == ['c', 'a', 'b']);
        check("ab#ba", |_| false);
        // equal precedence, left associative
        check("a|b#b", |w| w == ['a', 'b'] || w == ['b', 'a']);
    }

    #[test]
    fn errors_carry_line_and_token() {
        assert_eq!(
            parse("a+\n(b+)").err(),
            Some(ConverterError::Unexpected {
                line: 2,
                token: "')'".to_string(),
                expected: "a letter, 0, 1 or '('".to_string(),
            })
        );
        assert_eq!(
            parse("(ab").err(),
            Some(ConverterError::Unexpected {
                line: 1,
                token: "end of input".to_string(),
                expected: "')'".to_string(),
            })
        );
        assert!(matches!(
            parse("a)"),
            Err(ConverterError::Unexpected { line: 1, .. })
        ));
        assert!(matches!(parse(""), Err(ConverterError::Unexpected { .. })));
        assert!(matches!(
            parse("2a"),
            Err(ConverterError::Unexpected { token, .. }) if token == "number 2"
        ));
        assert!(parse("a\u{0}").is_err());
    }

    #[test]
    fn nesting_is_bounded() {
        let nested = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse(&nested(MAX_NESTING)).unwrap().accept(['a']));
        assert!(matches!(
            parse(&nested(MAX_NESTING + 1)),
            Err(ConverterError::Unexpected { token, .. }) if token == "'('"
        ));
        assert!(matches!(
            parse(&"(".repeat(200_000)),
            Err(ConverterError::Unexpected { line: 1, .. })
        ));
    }

    #[test]
    fn labels_of_other_types() {
        let automaton = Parser::new(WordLexer::new("(ping pong)2 + idle*")).parse().unwrap();
        let word = |w: &str| w.split_whitespace().map(String::from).collect::<Vec<_>>();
        assert!(automaton.accept(word("ping pong ping pong")));
        assert!(automaton.accept(word("idle idle")));
        assert!(automaton.accept(word("")));
        assert!(!automaton.accept(word("ping pong")));
        assert_eq!(automaton.alphabet().len(), 3);
    }
}
