//! Token types produced by the lexer.

use std::fmt;

use crate::Span;

/// A lexical token.
///
/// Whitespace and comments never become tokens; the lexer discards them.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// `[A-Za-z_-][A-Za-z0-9_\-./?@]*`
    Identifier(&'a str),
    /// A quoted string or heredoc, escapes already resolved.
    String(String),
    /// `-?[0-9]+(\.[0-9]+)?`
    Number(f64),
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Equals,
    Comma,
    /// End of input. Always the last token of a stream.
    Eof,
}

impl Token<'_> {
    /// Short name of the token class, used in "Expected ..." messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Identifier(_) => "identifier",
            Token::String(_) => "string",
            Token::Number(_) => "number",
            Token::LeftBrace => "brace_open",
            Token::RightBrace => "brace_close",
            Token::LeftBracket => "bracket_open",
            Token::RightBracket => "bracket_close",
            Token::Equals => "equals",
            Token::Comma => "comma",
            Token::Eof => "eof",
        }
    }
}

/// Displays the token's value the way it appears in error messages.
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "{name}"),
            Token::String(value) => write!(f, "{value}"),
            Token::Number(n) => write!(f, "{n}"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Equals => write!(f, "="),
            Token::Comma => write!(f, ","),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// A token with its byte span and 1-based line/column of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'a> {
    pub token: Token<'a>,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

impl<'a> PositionedToken<'a> {
    pub fn new(token: Token<'a>, span: Span, line: usize, column: usize) -> Self {
        Self {
            token,
            span,
            line,
            column,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.token, Token::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display_matches_source_value() {
        assert_eq!(Token::Identifier("node@end").to_string(), "node@end");
        assert_eq!(Token::Number(5.0).to_string(), "5");
        assert_eq!(Token::Number(-1.25).to_string(), "-1.25");
        assert_eq!(Token::RightBrace.to_string(), "}");
        assert_eq!(Token::Eof.to_string(), "EOF");
    }
}
