//! Column nodes and the implicit start and end nodes.

use drakon_core::{
    semantic::{DiagramNode, NodeKind},
    value::{BlockStatement, Value},
};

use super::{
    choices::process_choice_cases,
    context::{BuildContext, Placement, derive_label, implicit_attributes},
    questions::process_question_branches,
};
use crate::error::ErrorCode;

/// The message for a block name that may not appear as a column node.
fn reserved_block_message(name: &str) -> Option<String> {
    match name {
        "parameters" => Some(
            "Define parameters inside the `drakon` block using `parameters = { ... }` instead of a standalone block."
                .to_string(),
        ),
        "silhouette_loop" | "loop_silhouette" => Some(
            "The silhouette loop icon is managed by the renderer and cannot appear directly inside a lane."
                .to_string(),
        ),
        "start" | "end" => Some(format!(
            "Block \"{name}\" is implicit. Remove the explicit definition."
        )),
        _ => None,
    }
}

/// Turns a block into a node in `column`, then expands its branches.
///
/// Returns the new node id, or `None` when the block was rejected.
pub(super) fn create_column_node(cx: &mut BuildContext<'_>, column: usize, block: &BlockStatement) -> Option<String> {
    if let Some(message) = reserved_block_message(&block.name) {
        cx.error(ErrorCode::E304, message, block.span);
        return None;
    }

    let id = match block.first_label() {
        Some(label) => label.to_string(),
        None => format!("{}_{}", block.name, cx.column_len(column) + 1),
    };

    let parts = block.parts();
    let label = derive_label(&parts.attributes, &id);
    let kind = NodeKind::from_name(&block.name);
    let node = DiagramNode::new(&id, kind.clone(), label, parts.attributes.clone(), block.clone());
    if !cx.register_node(column, node, Placement::Append) {
        return None;
    }

    match kind {
        NodeKind::Question => process_question_branches(cx, &id, &parts.attributes, block.span),
        NodeKind::Choice => process_choice_cases(cx, column, &id, &parts.attributes, &parts.blocks, block.span),
        NodeKind::ForEach => process_for_each_body(cx, column, &id, &parts.blocks),
        _ => {}
    }
    Some(id)
}

/// Places the loop body below a `for_each` node and closes it with a
/// `loop_end` node.
fn process_for_each_body(cx: &mut BuildContext<'_>, column: usize, id: &str, blocks: &[&BlockStatement]) {
    if blocks.is_empty() {
        return;
    }
    for child in blocks {
        create_column_node(cx, column, child);
    }

    let mut loop_end_id = format!("{id}_end");
    let mut suffix = 1;
    while cx.has_node(&loop_end_id) {
        loop_end_id = format!("{id}_end_{suffix}");
        suffix += 1;
    }

    let loop_end = DiagramNode::new(
        &loop_end_id,
        NodeKind::LoopEnd,
        "",
        implicit_attributes([("loop", Value::from(id))]),
        BlockStatement::synthetic("loop_end", vec![loop_end_id.clone()]),
    );
    cx.register_node(column, loop_end, Placement::Append);
    cx.set_node_attribute(id, "loop_end", Value::from(loop_end_id));
}

/// Puts a start node at the top of the primary column, titled after the
/// diagram.
pub(super) fn ensure_start_node(cx: &mut BuildContext<'_>) {
    let title = cx.diagram.title().to_string();
    let fallback_anchor = format!("{}@start", cx.anchor_base);

    let existing = cx
        .diagram
        .nodes_of_kind(&NodeKind::Start)
        .next()
        .map(|node| node.id().to_string());

    let start_id = match existing {
        Some(id) => {
            if let Some(node) = cx.diagram.node_mut(&id) {
                node.set_label(&title);
                node.attributes_mut()
                    .insert("text".to_string(), Value::from(title.as_str()));
            }
            cx.ensure_anchored_alias(&id, Some(&fallback_anchor));
            id
        }
        None => {
            let node = DiagramNode::new(
                &fallback_anchor,
                NodeKind::Start,
                &title,
                implicit_attributes([
                    ("anchor", Value::from(fallback_anchor.as_str())),
                    ("text", Value::from(title.as_str())),
                ]),
                BlockStatement::synthetic("start", vec!["start".to_string()]),
            );
            let column = cx.primary_column;
            if !cx.register_node(column, node, Placement::Prepend) {
                // The author already owns the anchor id; leave the diagram without a start.
                return;
            }
            fallback_anchor
        }
    };

    cx.register_alias("start", &start_id);
    cx.start_node = Some(start_id);
}

/// Appends an `End` node to the primary column unless an end node exists.
pub(super) fn ensure_end_nodes(cx: &mut BuildContext<'_>) {
    let fallback_anchor = format!("{}@end", cx.anchor_base);
    let existing: Vec<String> = cx
        .diagram
        .nodes_of_kind(&NodeKind::End)
        .map(|node| node.id().to_string())
        .collect();

    if existing.is_empty() {
        let node = DiagramNode::new(
            &fallback_anchor,
            NodeKind::End,
            "End",
            implicit_attributes([("anchor", Value::from(fallback_anchor.as_str()))]),
            BlockStatement::synthetic("end", vec!["end".to_string()]),
        );
        let column = cx.primary_column;
        if cx.register_node(column, node, Placement::Append) {
            cx.register_alias("end", &fallback_anchor);
        }
        return;
    }

    for (index, id) in existing.iter().enumerate() {
        let fallback = (index == 0).then_some(fallback_anchor.as_str());
        cx.ensure_anchored_alias(id, fallback);
    }
}
