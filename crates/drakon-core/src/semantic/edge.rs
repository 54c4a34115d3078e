//! Diagram edges.

use std::fmt;

use crate::value::Attributes;

/// The flow kind of an edge.
///
/// Builder-generated edges use one of the named variants. Explicit `line`
/// blocks may declare any kind; unknown names are kept in [`EdgeKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EdgeKind {
    #[default]
    Main,
    Yes,
    No,
    Case,
    Else,
    Other(String),
}

impl EdgeKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "main" => Self::Main,
            "yes" => Self::Yes,
            "no" => Self::No,
            "case" => Self::Case,
            "else" => Self::Else,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Main => "main",
            Self::Yes => "yes",
            Self::No => "no",
            Self::Case => "case",
            Self::Else => "else",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed connection between two nodes.
///
/// `from` and `to` keep any `@anchor` suffix; the base ids name the node
/// itself and are what graph algorithms operate on.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramEdge {
    from: String,
    to: String,
    kind: EdgeKind,
    label: String,
    note: String,
    handle: String,
    attributes: Attributes,
    from_base: Option<String>,
    to_base: Option<String>,
}

impl DiagramEdge {
    /// Creates an edge with no label, note or handle.
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            label: String::new(),
            note: String::new(),
            handle: String::new(),
            attributes: Attributes::new(),
            from_base: None,
            to_base: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = handle.into();
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_bases(mut self, from_base: impl Into<String>, to_base: impl Into<String>) -> Self {
        self.set_bases(from_base, to_base);
        self
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn kind(&self) -> &EdgeKind {
        &self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn from_base(&self) -> Option<&str> {
        self.from_base.as_deref()
    }

    pub fn to_base(&self) -> Option<&str> {
        self.to_base.as_deref()
    }

    pub fn set_bases(&mut self, from_base: impl Into<String>, to_base: impl Into<String>) {
        self.from_base = Some(from_base.into());
        self.to_base = Some(to_base.into());
    }

    /// Returns whether the boolean attribute `key` is set to `true`.
    pub fn flag(&self, key: &str) -> bool {
        self.attributes
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    pub fn is_implicit(&self) -> bool {
        self.flag("implicit")
    }
}

impl fmt::Display for DiagramEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} [{}]", self.from, self.to, self.kind)
    }
}
