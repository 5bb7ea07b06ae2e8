use std::{iter::Peekable, str::Chars};

use super::ConverterError;
use crate::Show;

/// The tokens of the expression syntax. Which text makes up a [`Token::Letter`] is up to the
/// [`Lexer`], the operators are shared by all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<L> {
    /// `+`, the union of two languages.
    Plus,
    /// `#`, the synchronized product, see [`crate::Automaton::mix`].
    Mix,
    /// `|`, the shuffle, see [`crate::Automaton::shuffle`].
    Shuffle,
    /// `*`, iteration.
    Star,
    /// `^`, iteration with at least one repetition.
    Caret,
    /// A non-negative number. In front of an expression `0` and `1` denote the empty language
    /// and the empty word, behind one a number `n` denotes exactly `n` repetitions.
    Integer(usize),
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// A label.
    Letter(L),
    /// The end of the input.
    End,
}

impl<L: Show> Show for Token<L> {
    fn show(&self) -> String {
        match self {
            Token::Plus => "'+'".to_string(),
            Token::Mix => "'#'".to_string(),
            Token::Shuffle => "'|'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Caret => "'^'".to_string(),
            Token::Integer(n) => format!("number {n}"),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
            Token::Letter(l) => format!("letter {}", l.show()),
            Token::End => "end of input".to_string(),
        }
    }
}

/// A lexer turns text into a stream of [`Token`]s. It decides what a label looks like, which
/// makes the parser usable for arbitrary label types.
pub trait Lexer<L> {
    /// Produces the next token together with the line on which it starts. Once the input is
    /// exhausted, [`Token::End`] is returned forever.
    fn next_token(&mut self) -> Result<(Token<L>, usize), ConverterError>;
}

/// Shared scanning logic, the lexers only differ in how letters are read.
struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.chars.next();
        }
    }

    /// Reads an operator or a number, returns `None` if the next character starts neither. The
    /// character is not consumed in that case.
    fn symbol<L>(&mut self) -> Result<Option<Token<L>>, ConverterError> {
        let Some(&c) = self.chars.peek() else {
            return Ok(Some(Token::End));
        };
        let token = match c {
            '+' => Token::Plus,
            '#' => Token::Mix,
            '|' => Token::Shuffle,
            '*' => Token::Star,
            '^' => Token::Caret,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '0'..='9' => return self.integer().map(Some),
            _ => return Ok(None),
        };
        self.chars.next();
        Ok(Some(token))
    }

    fn integer<L>(&mut self) -> Result<Token<L>, ConverterError> {
        let mut value: usize = 0;
        while let Some(digit) = self.chars.peek().and_then(|c| c.to_digit(10)) {
            let character = self.chars.next().unwrap_or_default();
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit as usize))
                .ok_or(ConverterError::Lexical {
                    line: self.line,
                    character,
                })?;
        }
        Ok(Token::Integer(value))
    }
}

/// Reads single characters as letters. Whitespace is skipped, digits form numbers and the
/// operator characters `+ # | * ^ ( )` are reserved, every other printable character is a letter.
///
/// ```
/// use rational_automata::prelude::*;
///
/// let mut lexer = CharLexer::new("a*\n b");
/// assert_eq!(lexer.next_token().unwrap(), (Token::Letter('a'), 1));
/// assert_eq!(lexer.next_token().unwrap(), (Token::Star, 1));
/// assert_eq!(lexer.next_token().unwrap(), (Token::Letter('b'), 2));
/// assert_eq!(lexer.next_token().unwrap(), (Token::End, 2));
/// ```
pub struct CharLexer<'a> {
    scanner: Scanner<'a>,
}

impl<'a> CharLexer<'a> {
    /// Creates a lexer for the given text.
    pub fn new(text: &'a str) -> Self {
        Self {
            scanner: Scanner::new(text),
        }
    }
}

impl<'a> Lexer<char> for CharLexer<'a> {
    fn next_token(&mut self) -> Result<(Token<char>, usize), ConverterError> {
        let scanner = &mut self.scanner;
        scanner.skip_whitespace();
        let line = scanner.line;
        if let Some(token) = scanner.symbol()? {
            return Ok((token, line));
        }
        match scanner.chars.next() {
            Some(c) if c.is_control() => Err(ConverterError::Lexical { line, character: c }),
            Some(c) => Ok((Token::Letter(c), line)),
            None => Ok((Token::End, line)),
        }
    }
}

/// Reads identifiers as letters, so labels can be whole words. An identifier starts with an
/// alphabetic character or an underscore, followed by alphanumeric characters and underscores.
/// Juxtaposed identifiers have to be separated by whitespace.
///
/// ```
/// use rational_automata::prelude::*;
///
/// let automaton = Parser::new(WordLexer::new("open (read + write)* close")).parse().unwrap();
/// let word = ["open", "read", "read", "write", "close"].map(String::from);
/// assert!(automaton.accept(&word));
/// ```
pub struct WordLexer<'a> {
    scanner: Scanner<'a>,
}

impl<'a> WordLexer<'a> {
    /// Creates a lexer for the given text.
    pub fn new(text: &'a str) -> Self {
        Self {
            scanner: Scanner::new(text),
        }
    }
}

impl<'a> Lexer<String> for WordLexer<'a> {
    fn next_token(&mut self) -> Result<(Token<String>, usize), ConverterError> {
        let scanner = &mut self.scanner;
        scanner.skip_whitespace();
        let line = scanner.line;
        if let Some(token) = scanner.symbol()? {
            return Ok((token, line));
        }
        let mut identifier = String::new();
        while let Some(&c) = scanner.chars.peek() {
            let allowed = if identifier.is_empty() {
                c.is_alphabetic() || c == '_'
            } else {
                c.is_alphanumeric() || c == '_'
            };
            if !allowed {
                break;
            }
            identifier.push(c);
            scanner.chars.next();
        }
        match (identifier.is_empty(), scanner.chars.peek()) {
            (false, _) => Ok((Token::Letter(identifier), line)),
            (true, Some(&character)) => Err(ConverterError::Lexical { line, character }),
            (true, None) => Ok((Token::End, line)),
        }
    }
}
