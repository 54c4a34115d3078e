//! Lexical analyzer for DRAKON source text.
//!
//! The lexer converts source text into a stream of [`Token`]s. Whitespace,
//! `//` comments and `#` comments are discarded. Strings may be quoted with
//! `"` or `'` and span lines; heredocs use the `<<MARKER` form:
//!
//! ```text
//! text = <<-EOT
//!     indented lines
//!     lose their common indentation
//!   EOT
//! ```
//!
//! A `-` or `~` after `<<` strips the smallest indentation of the non-blank
//! lines. The closing line may itself be indented.
//!
//! The public entry point is [`tokenize`], which recovers from every error
//! and always returns a stream ending in [`Token::Eof`].

use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, opt, preceded},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{one_of, take_while},
};

use crate::{
    Span,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    line_index::LineIndex,
    text::strip_common_indent,
    tokens::{PositionedToken, Token},
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
    /// Extra text for the message, such as a heredoc marker.
    subject: Option<String>,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn cut_error(input: &Input<'_>, diagnostic: LexerDiagnostic) -> ErrMode<ContextError<LexerDiagnostic>> {
    ErrMode::Cut(ContextError::new().add_context(input, &input.checkpoint(), diagnostic))
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '?' | '@')
}

/// Whitespace and line comments.
fn trivia(input: &mut Input<'_>) -> IResult<()> {
    alt((
        take_while(1.., char::is_whitespace).void(),
        preceded(alt(("//", "#")), take_while(0.., |c| c != '\n')).void(),
    ))
    .parse_next(input)
}

/// A `"` or `'` quoted string.
///
/// Only `\n` and `\t` are translated; any other escaped character is taken
/// literally. Strings may contain raw newlines.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    let quote = one_of(['"', '\'']).parse_next(input)?;

    let mut value = String::new();
    loop {
        match input.next_token() {
            Some('\\') => match input.next_token() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some(other) => value.push(other),
                None => {
                    return Err(cut_error(
                        input,
                        LexerDiagnostic {
                            code: ErrorCode::E003,
                            help: Some("complete the escape and close the string"),
                            start,
                            subject: None,
                        },
                    ));
                }
            },
            Some(c) if c == quote => return Ok(Token::String(value)),
            Some(c) => value.push(c),
            None => {
                return Err(cut_error(
                    input,
                    LexerDiagnostic {
                        code: ErrorCode::E001,
                        help: Some(if quote == '"' {
                            "add closing `\"`"
                        } else {
                            "add closing `'`"
                        }),
                        start,
                        subject: None,
                    },
                ));
            }
        }
    }
}

/// A `<<MARKER`, `<<-MARKER` or `<<~MARKER` heredoc.
fn heredoc<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    let (strip, marker) = preceded(
        "<<",
        (
            opt(one_of(['-', '~'])),
            take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
        ),
    )
    .parse_next(input)?;

    // The rest of the opening line is ignored.
    take_while(0.., |c| c != '\n').void().parse_next(input)?;

    let mut lines: Vec<&str> = Vec::new();
    loop {
        if opt('\n').parse_next(input)?.is_none() {
            return Err(cut_error(
                input,
                LexerDiagnostic {
                    code: ErrorCode::E004,
                    help: Some("close the heredoc with a line containing only its marker"),
                    start,
                    subject: Some(marker.to_string()),
                },
            ));
        }
        let line: &str = take_while(0.., |c| c != '\n').parse_next(input)?;
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim() == marker {
            break;
        }
        lines.push(line);
    }

    let content = if strip.is_some() {
        strip_common_indent(&lines).join("\n")
    } else {
        lines.join("\n")
    };
    Ok(Token::String(content))
}

/// `-?[0-9]+(\.[0-9]+)?`
fn number<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .verify_map(|text: &str| text.parse::<f64>().ok())
        .map(Token::Number)
        .parse_next(input)
}

fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (one_of(is_identifier_start), take_while(0.., is_identifier_char))
        .take()
        .map(Token::Identifier)
        .parse_next(input)
}

fn punctuation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        '='.value(Token::Equals),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

/// Parse one token, or `None` for discarded trivia.
fn token<'a>(input: &mut Input<'a>) -> IResult<Option<Token<'a>>> {
    alt((
        trivia.value(None),
        string_literal.map(Some),
        heredoc.map(Some),
        number.map(Some), // Must come before identifier: `-` starts both
        identifier.map(Some),
        punctuation.map(Some),
    ))
    .parse_next(input)
}

/// Lexer that accumulates tokens and reports diagnostics.
struct Lexer<'a, 'd> {
    lines: LineIndex<'a>,
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: &'d mut DiagnosticCollector,
    errors: usize,
}

impl<'a, 'd> Lexer<'a, 'd> {
    fn new(source: &'a str, diagnostics: &'d mut DiagnosticCollector) -> Self {
        Self {
            lines: LineIndex::new(source),
            tokens: Vec::new(),
            diagnostics,
            errors: 0,
        }
    }

    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            let checkpoint = input.checkpoint();
            let start = input.current_token_start();
            match token(&mut input) {
                Ok(Some(token)) => {
                    let end = input.current_token_start();
                    self.push(token, Span::new(start..end));
                }
                Ok(None) => {}
                Err(ErrMode::Backtrack(_)) => {
                    input.reset(&checkpoint);
                    if let Some(ch) = input.next_token() {
                        self.unexpected_character(ch, start);
                    }
                }
                Err(err) => {
                    let error_pos = input.current_token_start();
                    let diagnostic = self.convert_err_mode(err, error_pos);
                    self.emit(diagnostic);
                    if error_pos == start {
                        input.next_token();
                    }
                }
            }
        }

        let end = input.current_token_start();
        self.push(Token::Eof, Span::new(end..end));
    }

    fn push(&mut self, token: Token<'a>, span: Span) {
        let (line, column) = self.lines.line_col(span.start());
        self.tokens
            .push(PositionedToken::new(token, span, line, column));
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.errors += 1;
        self.diagnostics.emit(diagnostic);
    }

    fn unexpected_character(&mut self, ch: char, start: usize) {
        let (line, column) = self.lines.line_col(start);
        let span = Span::new(start..start + ch.len_utf8());
        self.emit(
            Diagnostic::error(format!(
                "Unexpected character \"{ch}\" at line {line}, column {column}."
            ))
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description()),
        );
    }

    /// Convert a committed winnow error into a [`Diagnostic`].
    fn convert_err_mode(
        &self,
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        let Some(LexerDiagnostic {
            code,
            help,
            start,
            subject,
        }) = context_error.context().next()
        else {
            let span = Span::new(error_pos..error_pos.saturating_add(1));
            return Diagnostic::error(ErrorCode::E002.description())
                .with_code(ErrorCode::E002)
                .with_label(span, ErrorCode::E002.description());
        };

        let message = match code {
            ErrorCode::E001 => format!(
                "Unterminated string starting at line {}.",
                self.lines.line(*start)
            ),
            ErrorCode::E003 => format!(
                "Unterminated escape sequence at line {}.",
                self.lines.line(error_pos)
            ),
            ErrorCode::E004 => format!(
                "Unterminated heredoc \"{}\" starting at line {}.",
                subject.as_deref().unwrap_or_default(),
                self.lines.line(*start)
            ),
            other => other.description().to_string(),
        };

        let mut diag = Diagnostic::error(message)
            .with_code(*code)
            .with_label(Span::new(*start..error_pos), code.description());
        if let Some(h) = help {
            diag = diag.with_help(*h);
        }
        diag
    }
}

/// Tokenize source text, reporting problems into `diagnostics`.
///
/// Never fails: unexpected characters are skipped, unterminated strings and
/// heredocs produce no token. The returned stream always ends with
/// [`Token::Eof`].
pub fn tokenize<'a>(
    source: &'a str,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<PositionedToken<'a>> {
    let mut lexer = Lexer::new(source, diagnostics);
    lexer.tokenize(LocatingSlice::new(source));

    debug!(tokens = lexer.tokens.len(), errors = lexer.errors; "Tokenized source");
    trace!(tokens:? = lexer.tokens; "Token stream");
    lexer.tokens
}
