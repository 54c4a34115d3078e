//! The parsed statement tree.
//!
//! A document is a list of [`Statement`]s. Each statement is either an
//! attribute (`key = value`) or a block (`name "label"* { ... }`). Attribute
//! values are [`Value`]s, a small dynamically-typed value language:
//!
//! ```text
//! title  = "Order flow"          // Value::Str
//! column = 2                     // Value::Num
//! strict = true                  // Value::Bool
//! lines  = ["a", "b"]            // Value::List
//! tags   = { color = "red" }     // Value::Object (attributes only)
//! yes    = { action "a" {} }     // Value::Nested (contains a block)
//! ```

use std::fmt::{self, Write as _};

use indexmap::IndexMap;

use crate::span::Span;

/// Ordered `key -> value` map. A repeated key keeps its first position and
/// takes the last value.
pub type Attributes = IndexMap<String, Value>;

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Placeholder produced when a value could not be parsed.
    Null,
    Str(String),
    Num(f64),
    Bool(bool),
    List(Vec<Value>),
    Object(Attributes),
    /// A brace value that contained at least one nested block.
    Nested(Vec<Statement>),
}

impl Value {
    /// Returns the string if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the trimmed string if this is a non-blank [`Value::Str`].
    pub fn as_trimmed_str(&self) -> Option<&str> {
        self.as_str().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Attributes> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the value as a statement list.
    ///
    /// An empty object `{}` or empty list `[]` is an empty statement list,
    /// since the parser cannot tell them apart.
    pub fn as_statements(&self) -> Option<&[Statement]> {
        match self {
            Value::Nested(statements) => Some(statements),
            Value::Object(map) if map.is_empty() => Some(&[]),
            Value::List(items) if items.is_empty() => Some(&[]),
            _ => None,
        }
    }

    /// Renders the value as JSON text.
    pub fn to_json(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out);
        out
    }

    fn write_json(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("null"),
            Value::Str(s) => write_json_string(out, s),
            Value::Num(n) => {
                let _ = write!(out, "{n}");
            }
            Value::Bool(b) => {
                let _ = write!(out, "{b}");
            }
            Value::List(items) => {
                out.push('[');
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    item.write_json(out);
                }
                out.push(']');
            }
            Value::Object(map) => write_json_object(out, map),
            Value::Nested(statements) => {
                out.push('[');
                for (index, statement) in statements.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    match statement {
                        Statement::Attribute(attr) => {
                            out.push('{');
                            write_json_string(out, &attr.key);
                            out.push(':');
                            attr.value.write_json(out);
                            out.push('}');
                        }
                        Statement::Block(block) => write_json_string(out, &block.name),
                    }
                }
                out.push(']');
            }
        }
    }
}

fn write_json_object(out: &mut String, map: &Attributes) {
    out.push('{');
    for (index, (key, value)) in map.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        write_json_string(out, key);
        out.push(':');
        value.write_json(out);
    }
    out.push('}');
}

fn write_json_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Plain-text rendering: strings verbatim, lists comma-joined, objects as JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Num(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Object(_) | Value::Nested(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Num(value)
    }
}

/// One item of a document or block body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Attribute(AttributeStatement),
    Block(BlockStatement),
}

impl Statement {
    /// Returns the block if this statement is one.
    pub fn as_block(&self) -> Option<&BlockStatement> {
        match self {
            Statement::Block(block) => Some(block),
            Statement::Attribute(_) => None,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Statement::Attribute(attr) => attr.span,
            Statement::Block(block) => block.span,
        }
    }
}

/// `key = value`
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeStatement {
    pub key: String,
    pub value: Value,
    pub span: Span,
}

/// `name "label"* { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub name: String,
    pub labels: Vec<String>,
    pub body: Vec<Statement>,
    pub span: Span,
}

impl BlockStatement {
    /// Creates a block with no body and no source location.
    ///
    /// Used for nodes that are synthesized rather than written by the author.
    pub fn synthetic(name: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            name: name.into(),
            labels,
            body: Vec::new(),
            span: Span::default(),
        }
    }

    /// The first label, conventionally the block id.
    pub fn first_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// Splits the body into attributes and nested blocks.
    pub fn parts(&self) -> StatementParts<'_> {
        StatementParts::split(&self.body)
    }
}

/// The attributes and nested blocks of a statement list, kept apart.
#[derive(Debug, Clone, Default)]
pub struct StatementParts<'a> {
    pub attributes: Attributes,
    pub blocks: Vec<&'a BlockStatement>,
}

impl<'a> StatementParts<'a> {
    pub fn split(statements: &'a [Statement]) -> Self {
        let mut parts = Self::default();
        for statement in statements {
            match statement {
                Statement::Attribute(attr) => {
                    parts.attributes.insert(attr.key.clone(), attr.value.clone());
                }
                Statement::Block(block) => parts.blocks.push(block),
            }
        }
        parts
    }
}
