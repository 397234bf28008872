//! Lexer (tokenizer) for SPICE-style netlists.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Result, SpiceError};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in a netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element name, node label, keyword or probe head
    Identifier,
    /// Anything [`parse_value`] accepts, e.g. `10k`, `-5`, `1e-9`
    Number,
    /// A command (starts with '.')
    Directive,
    /// Open parenthesis '('
    OpenParen,
    /// Close parenthesis ')'
    CloseParen,
    /// Comma ','
    Comma,
    /// Newline
    Newline,
    /// End of file
    Eof,
}

fn is_word_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '(' | ')' | ',' | ';' | '#')
}

/// Lexer for tokenizing netlist input.
///
/// `;` and `#` start a comment anywhere on a line, `*` only as the first
/// non-blank character.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    /// Whether a token has been produced on the current line
    line_started: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            line_started: false,
        }
    }

    /// Number lines from `line` instead of 1.
    pub fn starting_at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    fn token(&mut self, kind: TokenKind, text: String, line: usize, column: usize) -> Token {
        self.line_started = kind != TokenKind::Newline;
        Token {
            kind,
            text,
            line,
            column,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let start_line = self.line;
        let start_column = self.column;

        let Some(&ch) = self.chars.peek() else {
            return Ok(self.token(TokenKind::Eof, String::new(), start_line, start_column));
        };

        let (kind, text) = match ch {
            '\n' => {
                self.advance();
                (TokenKind::Newline, "\n".to_string())
            }
            '(' | ')' | ',' => {
                self.advance();
                let kind = match ch {
                    '(' => TokenKind::OpenParen,
                    ')' => TokenKind::CloseParen,
                    _ => TokenKind::Comma,
                };
                (kind, ch.to_string())
            }
            _ if ch.is_control() => {
                return Err(SpiceError::lexer(
                    start_line,
                    start_column,
                    format!("unexpected character {:?}", ch),
                ));
            }
            _ => {
                let text = self.read_word();
                let is_directive = text.len() > 1
                    && text.starts_with('.')
                    && text[1..].starts_with(|c: char| c.is_alphabetic());
                let kind = if is_directive {
                    TokenKind::Directive
                } else if parse_value(&text).is_some() {
                    TokenKind::Number
                } else {
                    TokenKind::Identifier
                };
                (kind, text)
            }
        };

        Ok(self.token(kind, text, start_line, start_column))
    }

    /// Tokenize the whole input. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_to_end_of_line(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                ';' | '#' => self.skip_to_end_of_line(),
                '*' if !self.line_started => self.skip_to_end_of_line(),
                _ => break,
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if is_word_char(ch) && !ch.is_control() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }
}

/// Length in bytes of the leading `[+-]digits[.digits][e[+-]digits]` part.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(i);
    let mut mantissa_digits = int_end - i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        mantissa_digits += frac_end - (i + 1);
        i = frac_end;
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    i
}

/// Parse a number with an optional SI suffix.
///
/// Suffixes are case-insensitive: `f`, `p`, `n`, `u`/`µ`, `m`, `k`, `meg`,
/// `g`, `t`. Note that `M` is milli, as in SPICE; mega is `meg`.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let split = numeric_prefix_len(text);
    if split == 0 {
        return None;
    }

    let (number, suffix) = text.split_at(split);
    let multiplier = match suffix.to_lowercase().as_str() {
        "" => 1.0,
        "f" => 1e-15,
        "p" => 1e-12,
        "n" => 1e-9,
        "u" | "µ" | "μ" => 1e-6,
        "m" => 1e-3,
        "k" => 1e3,
        "meg" => 1e6,
        "g" => 1e9,
        "t" => 1e12,
        _ => return None,
    };

    number.parse::<f64>().ok().map(|v| v * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn value(text: &str) -> f64 {
        parse_value(text).unwrap()
    }

    #[test]
    fn test_parse_value() {
        assert_relative_eq!(value("10k"), 10_000.0);
        assert_relative_eq!(value("100n"), 100e-9);
        assert_relative_eq!(value("4.7u"), 4.7e-6);
        assert_relative_eq!(value("4.7µ"), 4.7e-6);
        assert_relative_eq!(value("2.2Meg"), 2.2e6);
        assert_relative_eq!(value("1M"), 1e-3);
        assert_relative_eq!(value("15f"), 15e-15);
        assert_relative_eq!(value("3T"), 3e12);
        assert_relative_eq!(value("1e-9"), 1e-9);
        assert_relative_eq!(value("1.5E3k"), 1.5e6);
        assert_relative_eq!(value("-5"), -5.0);
        assert_relative_eq!(value(".5"), 0.5);
        assert_relative_eq!(value("+2."), 2.0);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        for text in ["", "k", "-", ".", "1x", "10kohm", "1.2.3", "inf", "NaN", "e5", "1e"] {
            assert_eq!(parse_value(text), None, "{:?}", text);
        }
    }

    #[test]
    fn test_lexer_basic() {
        let tokens = Lexer::new("R1 in out 10k").tokenize().unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
        assert_eq!(tokens[2].text, "out");
        assert_eq!(tokens[3].column, 11);
    }

    #[test]
    fn test_lexer_probe_syntax() {
        let tokens = Lexer::new(".print Vmag(2, out) I(R1)").tokenize().unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, [".print", "Vmag", "(", "2", ",", "out", ")", "I", "(", "R1", ")", ""]);
        assert_eq!(tokens[0].kind, TokenKind::Directive);
        assert_eq!(tokens[4].kind, TokenKind::Comma);
    }

    #[test]
    fn test_lexer_comments() {
        let input = "* full line\nR1 1 0 1k ; trailing\n  * indented\nR2 1 0 2*3 # note";
        let tokens = Lexer::new(input).tokenize().unwrap();
        let texts: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Newline)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, ["R1", "1", "0", "1k", "R2", "1", "0", "2*3", ""]);
    }

    #[test]
    fn test_line_numbers() {
        let tokens = Lexer::new("R1 1 0 1\n\nR2 1 0 2")
            .starting_at_line(2)
            .tokenize()
            .unwrap();
        let r2 = tokens.iter().find(|t| t.text == "R2").unwrap();
        assert_eq!(r2.line, 4);
        assert_eq!(r2.column, 1);
    }

    #[test]
    fn test_lexer_rejects_control_characters() {
        let err = Lexer::new("R1 1 0 \u{7}").tokenize().unwrap_err();
        assert!(matches!(err, SpiceError::LexerError { line: 1, column: 8, .. }));
    }
}
