//! Builds a [`Diagram`] from parsed statements.
//!
//! The root `drakon` block holds diagram metadata and its child blocks. Child
//! blocks become nodes laid out in columns: the primary column first, then
//! one column per additional lane and per branch. The builder then adds
//!
//! - an implicit start node titled after the diagram and an implicit end
//!   node,
//! - a parameters node when the root sets `parameters`,
//! - `main` edges between consecutive nodes of a column,
//! - the edges of question branches and choice arms, including the rejoin
//!   edges that bring a branch back to its continuation.
//!
//! Every problem is reported to the [`DiagnosticCollector`]; construction
//! carries on with whatever remains valid.

mod attachments;
mod choices;
mod context;
mod edges;
mod nodes;
mod parameters;
mod questions;

use log::{debug, info};

use drakon_core::{
    semantic::{Diagram, DiagramEdge, EdgeKind},
    value::{BlockStatement, Statement, Value},
};

use crate::error::{Diagnostic, DiagnosticCollector, ErrorCode};
use context::{BuildContext, Placement, implicit_attributes};

/// Builds the diagram described by the first `drakon` block in `statements`.
///
/// Returns `None` only when there is no `drakon` block. Every other problem
/// is reported to `diagnostics` and the offending construct is skipped.
///
/// # Examples
///
/// ```
/// use drakon_parser::{builder::build, error::DiagnosticCollector, lexer::tokenize, parser::parse};
///
/// let source = r#"drakon "greet" { action "hello" { text = "Say hello" } }"#;
/// let mut diagnostics = DiagnosticCollector::new();
/// let tokens = tokenize(source, &mut diagnostics);
/// let statements = parse(&tokens, &mut diagnostics);
/// let diagram = build(&statements, &mut diagnostics).expect("root block");
///
/// let ids: Vec<_> = diagram.nodes().iter().map(|n| n.id()).collect();
/// assert_eq!(ids, ["greet@start", "hello", "greet@end"]);
/// assert_eq!(diagram.edges().len(), 2);
/// assert!(diagnostics.is_empty());
/// ```
pub fn build(statements: &[Statement], diagnostics: &mut DiagnosticCollector) -> Option<Diagram> {
    let Some(root) = statements
        .iter()
        .filter_map(Statement::as_block)
        .find(|block| block.name == "drakon")
    else {
        diagnostics.emit(
            Diagnostic::error("No `drakon` block found. Define the diagram first.")
                .with_code(ErrorCode::E300)
                .with_help("wrap the diagram in `drakon \"name\" { ... }`"),
        );
        return None;
    };

    let base = anchor_base(root.first_label().unwrap_or("diagram"));

    let parts = root.parts();
    let mut metadata = parts.attributes.clone();
    let parameters = metadata.shift_remove("parameters");
    let title = metadata
        .get("title")
        .and_then(Value::as_trimmed_str)
        .or(root.first_label())
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or("Diagram")
        .to_string();

    info!(title = title.as_str(); "Building diagram");

    let mut cx = BuildContext::new(diagnostics, Diagram::new(title, metadata), base);

    let mut pending_lines = Vec::new();
    let mut pending_attachments = Vec::new();
    let mut pending_notes = Vec::new();
    for block in &parts.blocks {
        match block.name.as_str() {
            "lane" => build_lane(&mut cx, block),
            "line" => pending_lines.push(*block),
            "attach" => pending_attachments.push(*block),
            "note" => pending_notes.push(*block),
            _ => {
                cx.primary_initialized = true;
                let column = cx.primary_column;
                nodes::create_column_node(&mut cx, column, block);
            }
        }
    }

    nodes::ensure_start_node(&mut cx);
    let parameters_edge = parameters.and_then(|value| add_parameters_node(&mut cx, &value));
    nodes::ensure_end_nodes(&mut cx);

    for block in pending_attachments {
        attachments::handle_attachment(&mut cx, block);
    }
    for block in pending_notes {
        attachments::handle_note(&mut cx, block);
    }

    if let Some(edge) = parameters_edge {
        if let (Some(from), Some(to)) = (edge.from_base(), edge.to_base()) {
            cx.edge_keys.insert((from.to_string(), to.to_string()));
        }
        cx.diagram.push_edge(edge);
    }

    for block in pending_lines {
        edges::handle_line(&mut cx, block);
    }

    let choice_targets = edges::resolve_next_targets(&mut cx);
    edges::connect_implicit_column_edges(&mut cx);

    let default_end = edges::default_end(&cx);
    edges::build_question_edges(&mut cx, default_end.as_deref());
    edges::build_choice_edges(&mut cx, &choice_targets, default_end.as_deref());
    edges::finalize_edge_anchors(&mut cx);

    debug!(
        nodes = cx.diagram.nodes().len(),
        edges = cx.diagram.edges().len(),
        columns = cx.columns.len();
        "Diagram built"
    );
    Some(cx.diagram)
}

/// Collapses each whitespace run of the diagram id to `_`.
fn anchor_base(id: &str) -> String {
    let mut base = String::with_capacity(id.len());
    let mut in_whitespace = false;
    for c in id.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                base.push('_');
            }
            in_whitespace = true;
        } else {
            base.push(c);
            in_whitespace = false;
        }
    }
    base
}

/// Places the blocks of a `lane` in the lane's column.
fn build_lane(cx: &mut BuildContext<'_>, block: &BlockStatement) {
    let lane_id = match block.first_label() {
        Some(label) => label.to_string(),
        None => format!("lane_{}", cx.lanes.len() + 1),
    };
    let column = cx.column_for_lane(&lane_id);
    if !cx.primary_initialized {
        cx.primary_column = column;
        cx.primary_initialized = true;
    }

    for child in block.parts().blocks {
        if matches!(child.name.as_str(), "line" | "attach" | "note") {
            cx.error(
                ErrorCode::E305,
                format!(
                    "Block \"{}\" is not supported within lane \"{lane_id}\". Move it to the diagram root.",
                    child.name
                ),
                child.span,
            );
            continue;
        }
        nodes::create_column_node(cx, column, child);
    }
}

/// Registers the parameters node in a column of its own and returns the
/// edge linking it to the start node.
fn add_parameters_node(cx: &mut BuildContext<'_>, value: &Value) -> Option<DiagramEdge> {
    if matches!(value, Value::Null) {
        return None;
    }
    let start = cx.start_node.clone()?;
    let column = cx.allocate_column();
    let node = parameters::build_parameters_node(value, &cx.anchor_base)?;
    let id = node.id().to_string();
    if !cx.register_node(column, node, Placement::Append) {
        return None;
    }
    cx.register_alias("parameters", &id);

    Some(
        DiagramEdge::new(&start, &id, EdgeKind::Main)
            .with_attributes(implicit_attributes([("role", Value::from("parameters"))]))
            .with_bases(&start, &id),
    )
}
