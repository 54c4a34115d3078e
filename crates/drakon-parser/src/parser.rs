//! Parser for DRAKON source tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into a
//! tree of [`Statement`]s. Leaf recognition uses winnow parsers over a
//! [`TokenSlice`]; the statement structure is driven by a small
//! recursive-descent loop that reports an error and skips one token whenever
//! it meets something unexpected, so one pass surfaces every syntax error.
//!
//! ```text
//! document   := (attribute | block)*
//! block      := IDENT STRING* '{' (attribute | block)* '}'
//! attribute  := IDENT '=' value
//! value      := STRING | NUMBER | IDENT | array | braceValue
//! array      := '[' value (',' value)* ']'
//! braceValue := '{' (attribute ','? | block)* '}'
//! ```
//!
//! A brace value collapses to [`Value::Object`] when it holds only attributes
//! and stays a [`Value::Nested`] statement list as soon as it holds a block.

use log::debug;
use winnow::{
    Parser as _,
    combinator::{peek, repeat},
    error::{ContextError, ErrMode, ModalResult},
    stream::{Stream, TokenSlice},
    token::any,
};

use drakon_core::value::{Attributes, AttributeStatement, BlockStatement, Statement, Value};

use crate::{
    Span,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    tokens::{PositionedToken, Token},
};

/// Context attached to leaf parser errors.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Context {
    /// The token class that was expected.
    Expected(&'static str),
}

type Input<'t> = TokenSlice<'t, PositionedToken<'t>>;
type IResult<O> = ModalResult<O, ContextError<Context>>;

/// Match one token of the given class (see [`Token::kind_name`]).
fn token_of<'t>(kind: &'static str) -> impl FnMut(&mut Input<'t>) -> IResult<&'t PositionedToken<'t>> {
    move |input: &mut Input<'t>| {
        any.verify(|token: &PositionedToken<'_>| token.token.kind_name() == kind)
            .context(Context::Expected(kind))
            .parse_next(input)
    }
}

fn string_label(input: &mut Input<'_>) -> IResult<String> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::String(value) => Some(value.clone()),
        _ => None,
    })
    .parse_next(input)
}

/// Parse a scalar value: string, number, boolean or bare identifier.
fn scalar_value(input: &mut Input<'_>) -> IResult<Value> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::String(value) => Some(Value::Str(value.clone())),
        Token::Number(n) => Some(Value::Num(*n)),
        Token::Identifier("true") => Some(Value::Bool(true)),
        Token::Identifier("false") => Some(Value::Bool(false)),
        Token::Identifier(name) => Some(Value::Str((*name).to_string())),
        _ => None,
    })
    .parse_next(input)
}

fn expected_kind(error: &ErrMode<ContextError<Context>>) -> Option<&'static str> {
    match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().find_map(|ctx| match ctx {
            Context::Expected(kind) => Some(*kind),
        }),
        ErrMode::Incomplete(_) => None,
    }
}

/// Recursive-descent driver with single-token error recovery.
struct StatementParser<'t, 'd> {
    tokens: &'t [PositionedToken<'t>],
    input: Input<'t>,
    diagnostics: &'d mut DiagnosticCollector,
    errors: usize,
}

impl<'t, 'd> StatementParser<'t, 'd> {
    fn new(tokens: &'t [PositionedToken<'t>], diagnostics: &'d mut DiagnosticCollector) -> Self {
        Self {
            tokens,
            input: TokenSlice::new(tokens),
            diagnostics,
            errors: 0,
        }
    }

    fn current(&self) -> Option<&'t PositionedToken<'t>> {
        self.input.peek_token()
    }

    fn at_end(&self) -> bool {
        self.current().is_none_or(PositionedToken::is_eof)
    }

    fn at(&self, kind: &str) -> bool {
        self.current().is_some_and(|t| t.token.kind_name() == kind)
    }

    /// Index of the next unconsumed token.
    fn position(&self) -> usize {
        self.tokens.len() - self.input.eof_offset()
    }

    /// Span from the token at `start` through the last consumed token.
    fn span_since(&self, start: usize) -> Span {
        let first = self.tokens.get(start).map(|t| t.span).unwrap_or_default();
        let end = self.position();
        if end > start {
            self.tokens
                .get(end - 1)
                .map_or(first, |last| first.union(last.span))
        } else {
            first
        }
    }

    /// Consume the current token. Never steps past [`Token::Eof`].
    fn advance(&mut self) {
        if !self.at_end() {
            self.input.next_token();
        }
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.errors += 1;
        self.diagnostics.emit(diagnostic);
    }

    fn unexpected(&mut self, message: String, help: Option<&'static str>) {
        let span = self.current().map(|t| t.span).unwrap_or_default();
        let mut diagnostic = Diagnostic::error(message)
            .with_code(ErrorCode::E100)
            .with_label(span, ErrorCode::E100.description());
        if let Some(help) = help {
            diagnostic = diagnostic.with_help(help);
        }
        self.emit(diagnostic);
    }

    /// Consume a token of the given class, or report it and consume whatever
    /// is there instead.
    fn expect(&mut self, kind: &'static str) -> Option<&'t PositionedToken<'t>> {
        let checkpoint = self.input.checkpoint();
        match token_of(kind).parse_next(&mut self.input) {
            Ok(token) => Some(token),
            Err(err) => {
                self.input.reset(&checkpoint);
                let expected = expected_kind(&err).unwrap_or(kind);
                let (found, line) = self
                    .current()
                    .map_or(("EOF".to_string(), 0), |t| (t.token.to_string(), t.line));
                self.unexpected(
                    format!("Unexpected token \"{found}\" at line {line}. Expected {expected}."),
                    None,
                );
                self.advance();
                None
            }
        }
    }

    /// `identifier '='` ahead?
    fn at_attribute(&mut self) -> bool {
        peek((token_of("identifier"), token_of("equals")))
            .parse_next(&mut self.input)
            .is_ok()
    }

    fn document(&mut self) -> Vec<Statement> {
        let mut statements = Vec::new();
        while !self.at_end() {
            if self.at("identifier") {
                statements.push(self.statement());
            } else if let Some(token) = self.current() {
                self.unexpected(
                    format!(
                        "Unexpected token \"{}\" at line {}.",
                        token.token, token.line
                    ),
                    Some("top-level statements start with an identifier"),
                );
                self.advance();
            }
        }
        statements
    }

    fn statement(&mut self) -> Statement {
        if self.at_attribute() {
            Statement::Attribute(self.attribute())
        } else {
            Statement::Block(self.block())
        }
    }

    fn block(&mut self) -> BlockStatement {
        let start = self.position();
        let name = self
            .expect("identifier")
            .map(|t| t.token.to_string())
            .unwrap_or_default();

        let labels: Vec<String> = repeat(0.., string_label)
            .parse_next(&mut self.input)
            .unwrap_or_default();

        self.expect("brace_open");
        let mut body = Vec::new();
        while !self.at_end() && !self.at("brace_close") {
            if self.at("identifier") {
                body.push(self.statement());
            } else if let Some(token) = self.current() {
                self.unexpected(
                    format!("Unexpected token \"{}\" in block \"{name}\".", token.token),
                    None,
                );
                self.advance();
            }
        }
        self.expect("brace_close");

        BlockStatement {
            name,
            labels,
            body,
            span: self.span_since(start),
        }
    }

    fn attribute(&mut self) -> AttributeStatement {
        let start = self.position();
        let key = self
            .expect("identifier")
            .map(|t| t.token.to_string())
            .unwrap_or_default();
        self.expect("equals");
        let value = self.value();

        AttributeStatement {
            key,
            value,
            span: self.span_since(start),
        }
    }

    fn value(&mut self) -> Value {
        if let Ok(value) = scalar_value.parse_next(&mut self.input) {
            return value;
        }
        if self.at("bracket_open") {
            return self.array();
        }
        if self.at("brace_open") {
            return self.brace_value();
        }

        let (found, line, column, span) = self.current().map_or(
            ("EOF".to_string(), 0, 0, Span::default()),
            |t| (t.token.to_string(), t.line, t.column, t.span),
        );
        self.emit(
            Diagnostic::error(format!(
                "Unexpected value \"{found}\" at line {line}, column {column}."
            ))
            .with_code(ErrorCode::E101)
            .with_label(span, ErrorCode::E101.description())
            .with_help("values are strings, numbers, identifiers, `[...]` or `{...}`"),
        );
        self.advance();
        Value::Null
    }

    fn array(&mut self) -> Value {
        self.expect("bracket_open");
        let mut items = Vec::new();
        while !self.at_end() && !self.at("bracket_close") {
            items.push(self.value());
            if self.at("comma") {
                self.advance();
            } else {
                break;
            }
        }
        self.expect("bracket_close");
        Value::List(items)
    }

    fn brace_value(&mut self) -> Value {
        self.expect("brace_open");
        let mut statements = Vec::new();
        while !self.at_end() && !self.at("brace_close") {
            if self.at("identifier") {
                statements.push(self.statement());
                if self.at("comma") {
                    self.advance();
                }
            } else {
                self.expect("identifier");
            }
        }
        self.expect("brace_close");

        if statements
            .iter()
            .any(|statement| matches!(statement, Statement::Block(_)))
        {
            return Value::Nested(statements);
        }

        let mut object = Attributes::new();
        for statement in statements {
            if let Statement::Attribute(attr) = statement {
                object.insert(attr.key, attr.value);
            }
        }
        Value::Object(object)
    }
}

/// Parse a token stream into statements, reporting syntax errors into
/// `diagnostics`.
///
/// Never fails; malformed input yields a partial statement list.
pub fn parse<'t>(
    tokens: &'t [PositionedToken<'t>],
    diagnostics: &mut DiagnosticCollector,
) -> Vec<Statement> {
    let mut parser = StatementParser::new(tokens, diagnostics);
    let statements = parser.document();
    debug!(statements = statements.len(), errors = parser.errors; "Parsed statements");
    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(source: &str) -> (Vec<Statement>, Vec<Diagnostic>) {
        let mut diagnostics = DiagnosticCollector::new();
        let tokens = tokenize(source, &mut diagnostics);
        let statements = parse(&tokens, &mut diagnostics);
        (statements, diagnostics.into_diagnostics())
    }

    fn parse_ok(source: &str) -> Vec<Statement> {
        let (statements, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        statements
    }

    fn block(statement: &Statement) -> &BlockStatement {
        statement.as_block().expect("expected a block")
    }

    fn attribute(statement: &Statement) -> &AttributeStatement {
        match statement {
            Statement::Attribute(attr) => attr,
            Statement::Block(_) => panic!("expected an attribute"),
        }
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message()).collect()
    }

    #[test]
    fn test_block_with_labels_and_body() {
        let statements = parse_ok(r#"drakon "d" "Title" { action "a" "Do it" {} }"#);

        assert_eq!(statements.len(), 1);
        let root = block(&statements[0]);
        assert_eq!(root.name, "drakon");
        assert_eq!(root.labels, ["d", "Title"]);
        let child = block(&root.body[0]);
        assert_eq!(child.name, "action");
        assert_eq!(child.labels, ["a", "Do it"]);
        assert!(child.body.is_empty());
    }

    #[test]
    fn test_scalar_values() {
        let statements = parse_ok("a = \"s\"\nb = 2.5\nc = true\nd = false\ne = bare_word");
        let values: Vec<_> = statements.iter().map(|s| &attribute(s).value).collect();
        assert_eq!(
            values,
            [
                &Value::Str("s".into()),
                &Value::Num(2.5),
                &Value::Bool(true),
                &Value::Bool(false),
                &Value::Str("bare_word".into()),
            ]
        );
    }

    #[test]
    fn test_array_values() {
        let statements = parse_ok(r#"lines = ["a", 1, [true]]"#);
        assert_eq!(
            attribute(&statements[0]).value,
            Value::List(vec![
                Value::Str("a".into()),
                Value::Num(1.0),
                Value::List(vec![Value::Bool(true)]),
            ])
        );
    }

    #[test]
    fn test_brace_value_with_only_attributes_is_object() {
        let statements = parse_ok(r#"tags = { color = "red", size = 3 color = "blue" }"#);
        let Value::Object(object) = &attribute(&statements[0]).value else {
            panic!("expected an object");
        };
        let keys: Vec<_> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, ["color", "size"]);
        assert_eq!(object["color"], Value::Str("blue".into()));
    }

    #[test]
    fn test_brace_value_with_block_is_nested() {
        let statements = parse_ok(r#"yes = { column = 2 action "a" {} }"#);
        let Value::Nested(body) = &attribute(&statements[0]).value else {
            panic!("expected nested statements");
        };
        assert_eq!(body.len(), 2);
        assert_eq!(attribute(&body[0]).key, "column");
        assert_eq!(block(&body[1]).labels, ["a"]);
    }

    #[test]
    fn test_empty_brace_value_is_empty_object() {
        let statements = parse_ok("no = {}");
        assert_eq!(
            attribute(&statements[0]).value,
            Value::Object(Attributes::new())
        );
    }

    #[test]
    fn test_unexpected_top_level_token_is_skipped() {
        let (statements, diagnostics) = parse_source("} drakon {}");
        assert_eq!(statements.len(), 1);
        assert_eq!(messages(&diagnostics), ["Unexpected token \"}\" at line 1."]);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_unexpected_token_in_block() {
        let (statements, diagnostics) = parse_source("drakon { 42 action {} }");
        assert_eq!(block(&statements[0]).body.len(), 1);
        assert_eq!(
            messages(&diagnostics),
            ["Unexpected token \"42\" in block \"drakon\"."]
        );
    }

    #[test]
    fn test_missing_brace_reports_expectation() {
        let (_, diagnostics) = parse_source("drakon \"d\" action {}");
        assert_eq!(
            messages(&diagnostics)[0],
            "Unexpected token \"action\" at line 1. Expected brace_open."
        );
    }

    #[test]
    fn test_unclosed_block_reports_eof() {
        let (statements, diagnostics) = parse_source("drakon {\n  title = \"x\"\n");
        assert_eq!(statements.len(), 1);
        assert_eq!(
            messages(&diagnostics),
            ["Unexpected token \"EOF\" at line 3. Expected brace_close."]
        );
    }

    #[test]
    fn test_unexpected_value() {
        let (statements, diagnostics) = parse_source("a = = b = 1");
        assert_eq!(attribute(&statements[0]).value, Value::Null);
        assert_eq!(
            messages(&diagnostics),
            ["Unexpected value \"=\" at line 1, column 5."]
        );
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E101));
        assert_eq!(attribute(&statements[1]).value, Value::Num(1.0));
    }

    #[test]
    fn test_statement_spans_cover_source() {
        let source = "drakon \"d\" { a = 1 }";
        let statements = parse_ok(source);
        let root = block(&statements[0]);
        assert_eq!(root.span, Span::new(0..source.len()));
        assert_eq!(&source[root.body[0].span().start()..root.body[0].span().end()], "a = 1");
    }

    #[test]
    fn test_empty_token_slice() {
        let mut diagnostics = DiagnosticCollector::new();
        let statements = parse(&[], &mut diagnostics);
        assert!(statements.is_empty());
        assert!(diagnostics.is_empty());
    }
}
