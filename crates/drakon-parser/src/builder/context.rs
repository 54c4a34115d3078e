//! Mutable state threaded through diagram construction.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::trace;

use drakon_core::{
    semantic::{Diagram, DiagramNode, EdgeKind},
    value::{Attributes, Value},
};

use crate::{
    Span,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
};

/// A resolved node reference: the full anchor and the node id it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Reference {
    pub full: String,
    pub base: String,
}

/// One of the two outcomes of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BranchKind {
    Yes,
    No,
}

impl BranchKind {
    pub fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    pub fn edge_kind(self) -> EdgeKind {
        match self {
            Self::Yes => EdgeKind::Yes,
            Self::No => EdgeKind::No,
        }
    }
}

/// How a question continues once its explicit branch is known.
#[derive(Debug, Clone)]
pub(super) struct QuestionBranch {
    pub branch_kind: BranchKind,
    /// The last node of the branch lane, `None` for direct branches.
    pub branch_end: Option<String>,
    pub default_kind: BranchKind,
    pub direct: bool,
    pub next: Option<String>,
    pub resolved_next: Option<Reference>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CaseKind {
    Case,
    Else,
}

impl CaseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Else => "else",
        }
    }

    pub fn edge_kind(self) -> EdgeKind {
        match self {
            Self::Case => EdgeKind::Case,
            Self::Else => EdgeKind::Else,
        }
    }
}

/// A `case` or `else` arm registered under a choice.
#[derive(Debug, Clone)]
pub(super) struct ChoiceCase {
    pub choice_id: String,
    pub id: String,
    pub kind: CaseKind,
    /// The last node of the arm; the case node itself when the arm is empty.
    pub branch_end: String,
    pub direct: bool,
    pub next: Option<String>,
    pub resolved_next: Option<Reference>,
    pub span: Span,
}

/// A `next` attribute written on a choice node.
#[derive(Debug, Clone)]
pub(super) struct ChoiceNext {
    pub choice_id: String,
    pub next: String,
    pub span: Span,
}

/// Where a registered node goes in its column and in the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Placement {
    Append,
    Prepend,
}

#[derive(Debug)]
pub(super) struct BuildContext<'d> {
    pub diagnostics: &'d mut DiagnosticCollector,
    pub diagram: Diagram,
    /// Alias to node id. The first registration of an alias wins.
    pub aliases: IndexMap<String, String>,
    /// Registered node ids with the span of their defining block.
    pub node_ids: IndexMap<String, Span>,
    /// Node ids per column, in column creation order.
    pub columns: IndexMap<usize, Vec<String>>,
    pub lanes: IndexMap<String, usize>,
    pub question_branches: IndexMap<String, QuestionBranch>,
    pub choice_cases: Vec<ChoiceCase>,
    pub choice_next: Vec<ChoiceNext>,
    /// `(from base, to base)` pairs that already carry an edge.
    pub edge_keys: HashSet<(String, String)>,
    pub anchor_base: String,
    pub primary_column: usize,
    pub start_node: Option<String>,
    has_explicit_lane: bool,
    pub primary_initialized: bool,
    next_column: usize,
}

impl<'d> BuildContext<'d> {
    pub fn new(diagnostics: &'d mut DiagnosticCollector, diagram: Diagram, anchor_base: String) -> Self {
        let mut cx = Self {
            diagnostics,
            diagram,
            aliases: IndexMap::new(),
            node_ids: IndexMap::new(),
            columns: IndexMap::new(),
            lanes: IndexMap::new(),
            question_branches: IndexMap::new(),
            choice_cases: Vec::new(),
            choice_next: Vec::new(),
            edge_keys: HashSet::new(),
            anchor_base,
            primary_column: 0,
            start_node: None,
            has_explicit_lane: false,
            primary_initialized: false,
            next_column: 0,
        };
        cx.primary_column = cx.allocate_column();
        cx
    }

    pub fn error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let mut diagnostic = Diagnostic::error(message).with_code(code);
        if !span.is_empty() {
            diagnostic = diagnostic.with_label(span, code.description());
        }
        self.diagnostics.emit(diagnostic);
    }

    pub fn warning(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let mut diagnostic = Diagnostic::warning(message).with_code(code);
        if !span.is_empty() {
            diagnostic = diagnostic.with_label(span, code.description());
        }
        self.diagnostics.emit(diagnostic);
    }

    /// Opens a fresh column to the right of every existing one.
    pub fn allocate_column(&mut self) -> usize {
        let column = self.next_column;
        self.next_column += 1;
        self.columns.entry(column).or_default();
        column
    }

    /// Makes sure `column` exists, keeping later allocations clear of it.
    pub fn ensure_column(&mut self, column: usize) {
        self.columns.entry(column).or_default();
        if column >= self.next_column {
            self.next_column = column.saturating_add(1);
        }
    }

    pub fn column_len(&self, column: usize) -> usize {
        self.columns.get(&column).map_or(0, Vec::len)
    }

    pub fn column_nodes(&self, column: usize) -> &[String] {
        self.columns.get(&column).map_or(&[], Vec::as_slice)
    }

    /// The column a lane places its nodes in.
    ///
    /// The first lane takes over the primary column; every later lane gets a
    /// column of its own.
    pub fn column_for_lane(&mut self, lane_id: &str) -> usize {
        if let Some(column) = self.lanes.get(lane_id) {
            return *column;
        }
        let column = if self.has_explicit_lane {
            self.allocate_column()
        } else {
            self.primary_column
        };
        self.has_explicit_lane = true;
        self.lanes.insert(lane_id.to_string(), column);
        column
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_ids.contains_key(id)
    }

    pub fn node_kind_is(&self, id: &str, name: &str) -> bool {
        self.diagram.node(id).is_some_and(|node| node.kind().as_str() == name)
    }

    /// Adds a node to a column and the diagram.
    ///
    /// Returns `false` and reports a duplicate when the id is taken.
    pub fn register_node(&mut self, column: usize, mut node: DiagramNode, placement: Placement) -> bool {
        let id = node.id().to_string();
        let span = node.block().span;
        if let Some(first) = self.node_ids.get(&id).copied() {
            let mut diagnostic = Diagnostic::error(format!("Duplicate node id \"{id}\"."))
                .with_code(ErrorCode::E301)
                .with_help("give each block a unique first label");
            if !span.is_empty() {
                diagnostic = diagnostic.with_label(span, "duplicate definition");
            }
            if !first.is_empty() {
                diagnostic = diagnostic.with_secondary_label(first, "first defined here");
            }
            self.diagnostics.emit(diagnostic);
            return false;
        }

        trace!(id = id.as_str(), column; "Registering node");
        node.set_column(column);
        self.ensure_column(column);
        self.node_ids.insert(id.clone(), span);

        let mut aliases = vec![id.clone()];
        aliases.extend(node.block().labels.iter().cloned());
        if let Some(anchor) = node.attributes().get("anchor").and_then(Value::as_trimmed_str) {
            aliases.push(anchor.to_string());
        }

        let ids = self.columns.entry(column).or_default();
        match placement {
            Placement::Append => {
                ids.push(id.clone());
                self.diagram.push_node(node);
            }
            Placement::Prepend => {
                ids.insert(0, id.clone());
                self.diagram.prepend_node(node);
            }
        }

        for alias in aliases {
            self.register_alias(&alias, &id);
        }
        true
    }

    /// Maps `alias` to `id` unless the alias is already taken.
    pub fn register_alias(&mut self, alias: &str, id: &str) {
        let alias = alias.trim();
        if alias.is_empty() || self.aliases.contains_key(alias) {
            return;
        }
        self.aliases.insert(alias.to_string(), id.to_string());
    }

    pub fn alias(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Resolves a reference written in the source to a node.
    ///
    /// A reference is an alias, a node id, or `node@anchor` where `node` is
    /// itself an alias or id. Errors are reported against `description`.
    pub fn resolve_reference(&mut self, value: Option<&Value>, description: &str, span: Span) -> Option<Reference> {
        let Some(raw) = value.and_then(Value::as_trimmed_str).map(str::to_string) else {
            self.error(
                ErrorCode::E303,
                format!("{description} must be a non-empty string."),
                span,
            );
            return None;
        };

        if let Some(direct) = self.alias(&raw).map(str::to_string) {
            if !self.has_node(&direct) {
                self.unknown_reference(description, &raw, span);
                return None;
            }
            return Some(Reference {
                full: direct.clone(),
                base: direct,
            });
        }

        let Some((head, suffix)) = raw.split_once('@') else {
            if self.has_node(&raw) {
                self.register_alias(&raw, &raw);
                return Some(Reference {
                    full: raw.clone(),
                    base: raw,
                });
            }
            self.unknown_reference(description, &raw, span);
            return None;
        };

        let head = head.trim();
        let base = self.alias(head).unwrap_or(head).to_string();
        if !self.has_node(&base) {
            self.unknown_reference(description, head, span);
            return None;
        }
        Some(Reference {
            full: format!("{base}@{suffix}"),
            base,
        })
    }

    fn unknown_reference(&mut self, description: &str, raw: &str, span: Span) {
        self.error(
            ErrorCode::E302,
            format!("{description} refers to unknown node \"{raw}\"."),
            span,
        );
    }

    /// Registers the node's `anchor` attribute as an alias, filling it from
    /// `fallback` when the node has none.
    pub fn ensure_anchored_alias(&mut self, id: &str, fallback: Option<&str>) {
        let Some(node) = self.diagram.node_mut(id) else {
            return;
        };
        let anchor = match node.attributes().get("anchor").and_then(Value::as_trimmed_str) {
            Some(anchor) => anchor.to_string(),
            None => {
                let Some(fallback) = fallback else {
                    return;
                };
                node.attributes_mut()
                    .insert("anchor".to_string(), Value::from(fallback));
                fallback.to_string()
            }
        };
        self.register_alias(&anchor, id);
    }

    pub fn set_node_attribute(&mut self, id: &str, key: &str, value: Value) {
        if let Some(node) = self.diagram.node_mut(id) {
            node.attributes_mut().insert(key.to_string(), value);
        }
    }
}

/// The display label of a block: `text`, else `lines` joined, else `fallback`.
pub(super) fn derive_label(attributes: &Attributes, fallback: &str) -> String {
    if let Some(text) = attributes.get("text").and_then(Value::as_str) {
        return text.to_string();
    }
    if let Some(lines) = attributes
        .get("lines")
        .and_then(Value::as_list)
        .filter(|lines| !lines.is_empty())
    {
        return lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
    }
    fallback.to_string()
}

/// Builds an attribute map of `implicit = true` followed by `entries`.
pub(super) fn implicit_attributes<const N: usize>(entries: [(&str, Value); N]) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert("implicit".to_string(), Value::Bool(true));
    for (key, value) in entries {
        attributes.insert(key.to_string(), value);
    }
    attributes
}
