use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::trace;

use super::{CharLexer, ConverterError, Expression, Lexer, Token};
use crate::{Automaton, Label, Show, State};

impl<L: Label> Automaton<L> {
    /// Converts `self` into an equivalent [`Expression`] by state elimination. Every transition
    /// is first turned into an edge labeled with an expression, parallel edges are joined by a
    /// union. Then, one after the other, every state `q` other than the initial and terminal
    /// state is removed: for every edge `p --a--> q` and every edge `q --b--> r` the edge
    /// `p --a r* b--> r` is added, where `r` is the union of the loops on `q`. In the end, the
    /// edge from the initial to the terminal state describes the language, if there is none the
    /// language is empty.
    ///
    /// The automaton has to be normalized, i.e. it has exactly one initial state without incoming
    /// transitions and a different, single terminal state without outgoing transitions, see
    /// [`Automaton::normalize`]. Otherwise a [`ConverterError::NotNormalized`] is returned.
    pub fn to_expression(&self) -> Result<Expression<L>, ConverterError> {
        let (initial, terminal) = self
            .normalized_endpoints()
            .map_err(ConverterError::NotNormalized)?;

        let mut edges: BTreeMap<(State, State), Expression<L>> = BTreeMap::new();
        for t in self.transitions() {
            let expression = t.label.map_or(Expression::One, Expression::Letter);
            join(&mut edges, t.start, t.end, expression);
        }

        for q in self.states().filter(|&q| q != initial && q != terminal) {
            let repeated = edges
                .remove(&(q, q))
                .map_or(Expression::One, Expression::star);
            let incoming = take(&mut edges, |&(_, end)| end == q);
            let outgoing = take(&mut edges, |&(start, _)| start == q);
            trace!(
                "eliminating {} with {} incoming and {} outgoing edges",
                q.show(),
                incoming.len(),
                outgoing.len()
            );
            for ((p, _), a) in &incoming {
                for ((_, r), b) in &outgoing {
                    let bypass = a.clone().product(repeated.clone()).product(b.clone());
                    join(&mut edges, *p, *r, bypass);
                }
            }
        }

        Ok(edges
            .remove(&(initial, terminal))
            .unwrap_or(Expression::Zero))
    }

    /// Converts `self` into a regular expression string by state elimination, see
    /// [`Automaton::to_expression`]. The result can be read back with [`super::parse`], so every
    /// label has to be shown as a single character that [`CharLexer`] reads as a letter. Digits,
    /// operators and whitespace are rejected with [`ConverterError::Unrepresentable`].
    ///
    /// ```
    /// use rational_automata::prelude::*;
    ///
    /// let automaton = parse("ab*c").unwrap();
    /// assert_eq!(automaton.normalize().to_rexpression().unwrap(), "ab*c");
    ///
    /// // the initial state is terminal as well
    /// let looping = parse("(ab)*").unwrap();
    /// assert!(looping.to_rexpression().is_err());
    /// ```
    pub fn to_rexpression(&self) -> Result<String, ConverterError> {
        let expression = self.to_expression()?;
        spelled_out(&expression)?;
        Ok(expression.to_string())
    }
}

fn spelled_out<L: Label>(expression: &Expression<L>) -> Result<(), ConverterError> {
    match expression {
        Expression::Zero | Expression::One => Ok(()),
        Expression::Letter(l) => {
            let text = l.show();
            if reads_as_letter(&text) {
                Ok(())
            } else {
                Err(ConverterError::Unrepresentable(text))
            }
        }
        Expression::Plus(left, right) | Expression::Product(left, right) => {
            spelled_out(left)?;
            spelled_out(right)
        }
        Expression::Iteration(inner) => spelled_out(inner),
    }
}

/// Whether `text` is a single character that lexes back to exactly that letter.
fn reads_as_letter(text: &str) -> bool {
    let mut chars = text.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return false;
    };
    let mut lexer = CharLexer::new(text);
    matches!(
        (lexer.next_token(), lexer.next_token()),
        (Ok((Token::Letter(l), _)), Ok((Token::End, _))) if l == c
    )
}

fn join<L: Label>(
    edges: &mut BTreeMap<(State, State), Expression<L>>,
    start: State,
    end: State,
    expression: Expression<L>,
) {
    let joined = match edges.remove(&(start, end)) {
        Some(existing) => existing.plus(expression),
        None => expression,
    };
    edges.insert((start, end), joined);
}

fn take<L, F>(
    edges: &mut BTreeMap<(State, State), Expression<L>>,
    selected: F,
) -> Vec<((State, State), Expression<L>)>
where
    F: Fn(&(State, State)) -> bool,
{
    let keys = edges.keys().filter(|key| selected(key)).copied().collect_vec();
    keys.into_iter()
        .filter_map(|key| edges.remove(&key).map(|expression| (key, expression)))
        .collect()
}
