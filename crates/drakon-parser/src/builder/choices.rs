//! `choice` blocks and their `case` and `else` arms.
//!
//! The first arm shares the choice's column; each later arm opens a column
//! of its own.

use drakon_core::{
    semantic::{DiagramNode, NodeKind},
    value::{Attributes, BlockStatement, Value},
};

use super::{
    context::{BuildContext, CaseKind, ChoiceCase, ChoiceNext, Placement, derive_label},
    nodes::create_column_node,
};
use crate::Span;

fn case_kind(name: &str) -> Option<CaseKind> {
    match name {
        "case" => Some(CaseKind::Case),
        "else" => Some(CaseKind::Else),
        _ => None,
    }
}

/// Registers the arms of choice `id` and the nodes inside them.
pub(super) fn process_choice_cases(
    cx: &mut BuildContext<'_>,
    column: usize,
    id: &str,
    attributes: &Attributes,
    blocks: &[&BlockStatement],
    span: Span,
) {
    if let Some(next) = attributes.get("next").and_then(Value::as_trimmed_str) {
        cx.choice_next.push(ChoiceNext {
            choice_id: id.to_string(),
            next: next.to_string(),
            span,
        });
    }

    let mut cases = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        let Some(kind) = case_kind(&block.name) else {
            create_column_node(cx, column, block);
            continue;
        };

        let parts = block.parts();
        let case_id = match block.first_label() {
            Some(label) => label.to_string(),
            None => format!("{id}_{}_{}", block.name, cases.len() + 1),
        };
        let label = derive_label(&parts.attributes, &case_id);
        let branch_column = if index == 0 { column } else { cx.allocate_column() };

        let node_kind = match kind {
            CaseKind::Case => NodeKind::ChoiceCase,
            CaseKind::Else => NodeKind::ChoiceElse,
        };
        let node = DiagramNode::new(&case_id, node_kind, label, parts.attributes.clone(), (*block).clone());
        if !cx.register_node(branch_column, node, Placement::Append) {
            continue;
        }

        let mut first_child = None;
        let mut last_child = case_id.clone();
        for child in &parts.blocks {
            let Some(child_id) = create_column_node(cx, branch_column, child) else {
                continue;
            };
            if first_child.is_none() {
                first_child = Some(child_id.clone());
            }
            last_child = child_id;
        }

        cases.push(ChoiceCase {
            choice_id: id.to_string(),
            id: case_id,
            kind,
            branch_end: last_child,
            direct: first_child.is_none(),
            next: parts
                .attributes
                .get("next")
                .and_then(Value::as_trimmed_str)
                .map(str::to_string),
            resolved_next: None,
            span: block.span,
        });
    }

    cx.choice_cases.extend(cases);
}

#[cfg(test)]
mod tests {
    use drakon_core::semantic::Diagram;

    use super::*;
    use crate::error::DiagnosticCollector;

    fn block(name: &str, labels: &[&str]) -> BlockStatement {
        BlockStatement::synthetic(name, labels.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_arms_take_their_own_columns() {
        let mut diagnostics = DiagnosticCollector::new();
        let mut cx = BuildContext::new(&mut diagnostics, Diagram::default(), "d".to_string());
        let first = block("case", &["small"]);
        let second = block("case", &[]);
        let fallback = block("else", &[]);
        let blocks = [&first, &second, &fallback];

        process_choice_cases(&mut cx, 0, "size", &Attributes::new(), &blocks, Span::default());

        let ids: Vec<_> = cx.choice_cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["small", "size_case_2", "size_else_3"]);
        let columns: Vec<_> = ids
            .iter()
            .filter_map(|id| cx.diagram.node(id).map(DiagramNode::column))
            .collect();
        assert_eq!(columns, [0, 1, 2]);
        assert!(cx.choice_cases.iter().all(|c| c.direct));
        assert_eq!(cx.choice_cases[2].kind, CaseKind::Else);
    }
}
