//! Lexer (tokenizer) for the netlist format.

use crate::error::{OhmlabError, Result};

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

/// Token types in the netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier (component name, net name, keyword)
    Identifier,
    /// A number (integer or floating point, possibly with suffix)
    Number,
    /// A directive (starts with '.')
    Directive,
    /// Equals sign '='
    Equals,
    /// Newline
    Newline,
    /// End of file
    Eof,
}

/// Unit words a value may carry after its scale suffix ("9V", "4.7kOhm").
const UNIT_WORDS: [&str; 5] = ["ohms", "ohm", "Ω", "v", "a"];

/// Lexer for tokenizing netlist input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let start_line = self.line;
        let start_column = self.column;
        let token = |kind, text: String| Token {
            kind,
            text,
            line: start_line,
            column: start_column,
        };

        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => return Ok(token(TokenKind::Eof, String::new())),
        };

        let tok = match ch {
            '\n' => {
                self.advance();
                token(TokenKind::Newline, "\n".to_string())
            }
            '.' => {
                self.advance();
                let text = self.read_identifier();
                if text.is_empty() {
                    return Err(OhmlabError::lexer(start_line, start_column, "expected directive name after '.'"));
                }
                token(TokenKind::Directive, format!(".{}", text))
            }
            '=' => {
                self.advance();
                token(TokenKind::Equals, "=".to_string())
            }
            '-' | '+' | '0'..='9' => token(TokenKind::Number, self.read_number()),
            _ if ch.is_alphabetic() || ch == '_' => token(TokenKind::Identifier, self.read_identifier()),
            _ => {
                return Err(OhmlabError::lexer(
                    start_line,
                    start_column,
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        Ok(tok)
    }

    /// Collect every token up to and including `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
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

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' || ch == ',' {
                self.advance();
            } else if ch == '#' || ch == ';' {
                // Skip comment until end of line
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        self.read_while(|ch| ch.is_alphanumeric() || ch == '_')
    }

    fn read_digits(&mut self, text: &mut String) {
        text.push_str(&self.read_while(|ch| ch.is_ascii_digit()));
    }

    fn read_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if !keep(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();

        // Optional sign
        if let Some(&ch) = self.chars.peek() {
            if ch == '-' || ch == '+' {
                text.push(ch);
                self.advance();
            }
        }

        self.read_digits(&mut text);

        if let Some(&'.') = self.chars.peek() {
            text.push('.');
            self.advance();
            self.read_digits(&mut text);
        }

        if let Some(&ch) = self.chars.peek() {
            if ch == 'e' || ch == 'E' {
                text.push(ch);
                self.advance();
                if let Some(&sign) = self.chars.peek() {
                    if sign == '-' || sign == '+' {
                        text.push(sign);
                        self.advance();
                    }
                }
                self.read_digits(&mut text);
            }
        }

        // Suffixes and unit words stay in the text. A net such as "1a" must
        // not collapse into "1"; `parse_value` strips units when a value is read.
        text.push_str(&self.read_identifier());

        text
    }
}

/// Parse a number string with optional scale suffix and unit word.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = strip_unit(text.trim());
    let last = text.chars().last()?;

    let multiplier = match last {
        'p' => 1e-12,
        'n' => 1e-9,
        'u' | 'µ' => 1e-6,
        'm' => 1e-3,
        'k' | 'K' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        _ => 1.0,
    };
    let num_str = if multiplier != 1.0 {
        &text[..text.len() - last.len_utf8()]
    } else {
        text
    };

    num_str.parse::<f64>().ok().map(|v| v * multiplier)
}

fn strip_unit(text: &str) -> &str {
    for unit in UNIT_WORDS {
        if text.len() <= unit.len() {
            continue;
        }
        let split = text.len() - unit.len();
        if let (Some(head), Some(tail)) = (text.get(..split), text.get(split..)) {
            if tail.eq_ignore_ascii_case(unit) {
                return head;
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_value() {
        assert_relative_eq!(parse_value("10k").unwrap(), 10_000.0);
        assert_relative_eq!(parse_value("100n").unwrap(), 100e-9);
        assert_relative_eq!(parse_value("4.7u").unwrap(), 4.7e-6);
        assert_relative_eq!(parse_value("1M").unwrap(), 1_000_000.0);
        assert_relative_eq!(parse_value("2.2").unwrap(), 2.2);
        assert_relative_eq!(parse_value("1e-9").unwrap(), 1e-9);
        assert_relative_eq!(parse_value("-3").unwrap(), -3.0);
        assert_eq!(parse_value("-"), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn test_lexer_basic() {
        let tokens = Lexer::new("R1 in out 10k").tokenize().unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
        assert_eq!(tokens[0].text, "R1");
        assert_eq!(tokens[3].text, "10k");
    }

    #[test]
    fn test_unit_words() {
        let tokens = Lexer::new("V1 a 0 9V\nR1 a 0 4.7kOhm").tokenize().unwrap();
        assert_eq!(tokens[3].text, "9V");
        assert_eq!(tokens[4].kind, TokenKind::Newline);
        assert_eq!(tokens[8].text, "4.7kOhm");
        assert_eq!(tokens[8].line, 2);

        assert_relative_eq!(parse_value("9V").unwrap(), 9.0);
        assert_relative_eq!(parse_value("4.7kOhm").unwrap(), 4700.0);
        assert_relative_eq!(parse_value("220ohms").unwrap(), 220.0);
        assert_relative_eq!(parse_value("10mA").unwrap(), 0.01);
        assert_relative_eq!(parse_value("1kΩ").unwrap(), 1000.0);
        assert_eq!(parse_value("3v3"), None);
        assert_eq!(parse_value("v"), None);
    }

    #[test]
    fn test_net_names_starting_with_digits() {
        let tokens = Lexer::new("R1 1a 1b 100\nV1 3v3 0").tokenize().unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[1].text, "1a");
        assert_eq!(tokens[2].text, "1b");
        assert_eq!(tokens[6].text, "3v3");
    }

    #[test]
    fn test_lexer_directive_and_comment() {
        let tokens = Lexer::new(".supply 5 ; bench default\n# nothing").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Directive);
        assert_eq!(tokens[0].text, ".supply");
        assert_eq!(tokens[1].text, "5");
        assert_eq!(tokens[2].kind, TokenKind::Newline);
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("R1 a b @").tokenize().unwrap_err();
        assert!(matches!(err, OhmlabError::LexerError { line: 1, column: 8, .. }));
    }
}
