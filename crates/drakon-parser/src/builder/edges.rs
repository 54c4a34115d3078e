//! Explicit `line` blocks and every implicit edge.

use indexmap::IndexMap;
use log::debug;

use drakon_core::{
    semantic::{DiagramEdge, EdgeKind, base_anchor},
    value::{Attributes, BlockStatement, Value},
};

use super::context::{BuildContext, ChoiceCase, Reference, implicit_attributes};
use crate::{Span, error::ErrorCode};

fn string_attribute<'a>(attributes: &'a Attributes, key: &str) -> Option<&'a str> {
    attributes.get(key).and_then(Value::as_str)
}

/// `line { from = "a" to = "b@left" kind = "yes" label = "..." }`
pub(super) fn handle_line(cx: &mut BuildContext<'_>, block: &BlockStatement) {
    let mut attributes = block.parts().attributes;
    let from = cx.resolve_reference(attributes.get("from"), "Line \"from\"", block.span);
    let to = cx.resolve_reference(attributes.get("to"), "Line \"to\"", block.span);
    let (Some(from), Some(to)) = (from, to) else {
        return;
    };

    attributes.insert("from".to_string(), Value::from(from.full.as_str()));
    attributes.insert("to".to_string(), Value::from(to.full.as_str()));

    let kind = string_attribute(&attributes, "kind").map_or(EdgeKind::Main, EdgeKind::from_name);
    let label = string_attribute(&attributes, "label").unwrap_or_default().to_string();
    let note = string_attribute(&attributes, "note").unwrap_or_default().to_string();
    let handle = string_attribute(&attributes, "handle").unwrap_or_default().to_string();

    cx.edge_keys.insert((from.base.clone(), to.base.clone()));
    cx.diagram.push_edge(
        DiagramEdge::new(from.full, to.full, kind)
            .with_label(label)
            .with_note(note)
            .with_handle(handle)
            .with_attributes(attributes)
            .with_bases(from.base, to.base),
    );
}

/// Resolves the `next` targets of questions, choices and cases.
///
/// Returns the resolved choice targets keyed by choice id.
pub(super) fn resolve_next_targets(cx: &mut BuildContext<'_>) -> IndexMap<String, Reference> {
    let questions: Vec<(String, String, Span)> = cx
        .question_branches
        .iter()
        .filter_map(|(id, info)| info.next.clone().map(|next| (id.clone(), next, info.span)))
        .collect();
    for (id, next, span) in questions {
        let resolved = cx.resolve_reference(Some(&Value::from(next)), &format!("Question \"{id}\" next"), span);
        if let Some(info) = cx.question_branches.get_mut(&id) {
            info.resolved_next = resolved;
        }
    }

    let mut choice_targets = IndexMap::new();
    for record in std::mem::take(&mut cx.choice_next) {
        let description = format!("Choice \"{}\" next", record.choice_id);
        if let Some(resolved) = cx.resolve_reference(Some(&Value::from(record.next)), &description, record.span) {
            choice_targets.insert(record.choice_id, resolved);
        }
    }

    let mut cases = std::mem::take(&mut cx.choice_cases);
    for case in &mut cases {
        let Some(next) = case.next.clone() else {
            continue;
        };
        let description = format!("Case \"{}\" next", case.id);
        case.resolved_next = cx.resolve_reference(Some(&Value::from(next)), &description, case.span);
    }
    cx.choice_cases = cases;

    choice_targets
}

/// Pushes `edge` unless its endpoint pair already carries an edge.
fn push_keyed(cx: &mut BuildContext<'_>, edge: DiagramEdge, from_base: &str, to_base: &str) {
    if cx.edge_keys.insert((from_base.to_string(), to_base.to_string())) {
        cx.diagram.push_edge(edge.with_bases(from_base, to_base));
    }
}

/// Links consecutive nodes of every column with `main` edges.
///
/// Questions and choices are skipped since their outgoing edges come from
/// their branches.
pub(super) fn connect_implicit_column_edges(cx: &mut BuildContext<'_>) {
    let pairs: Vec<(String, String)> = cx
        .columns
        .values()
        .flat_map(|ids| ids.windows(2).map(|pair| (pair[0].clone(), pair[1].clone())))
        .collect();

    for (from, to) in pairs {
        let branching = (cx.node_kind_is(&from, "question") && cx.question_branches.contains_key(&from))
            || (cx.node_kind_is(&from, "choice") && cx.choice_cases.iter().any(|case| case.choice_id == from));
        if branching {
            continue;
        }
        let edge = DiagramEdge::new(&from, &to, EdgeKind::Main).with_attributes(implicit_attributes([]));
        push_keyed(cx, edge, &from, &to);
    }
}

/// The `next` target of a question or choice with nothing explicit: the
/// node aliased `end`, else the first end node.
pub(super) fn default_end(cx: &BuildContext<'_>) -> Option<String> {
    cx.alias("end").map(str::to_string).or_else(|| {
        cx.diagram
            .nodes()
            .iter()
            .find(|node| node.kind().as_str() == "end")
            .map(|node| node.id().to_string())
    })
}

/// Adds the default, direct and rejoin edges of every question.
pub(super) fn build_question_edges(cx: &mut BuildContext<'_>, default_end: Option<&str>) {
    let branches: Vec<_> = cx
        .question_branches
        .iter()
        .map(|(id, info)| (id.clone(), info.clone()))
        .collect();

    for (question, info) in branches {
        let target = match (&info.resolved_next, default_end) {
            (Some(resolved), _) => resolved.clone(),
            (None, Some(end)) => Reference {
                full: end.to_string(),
                base: end.to_string(),
            },
            (None, None) => continue,
        };

        let main = DiagramEdge::new(&question, &target.full, info.default_kind.edge_kind())
            .with_label(info.default_kind.label())
            .with_attributes(implicit_attributes([
                ("branch", Value::from(info.default_kind.as_str())),
                ("branch_main", Value::Bool(true)),
            ]));
        push_keyed(cx, main, &question, &target.base);

        if info.direct {
            // Shares its endpoints with the main edge, so it bypasses the key set.
            cx.diagram.push_edge(
                DiagramEdge::new(&question, &target.full, info.branch_kind.edge_kind())
                    .with_label(info.branch_kind.label())
                    .with_attributes(implicit_attributes([
                        ("branch", Value::from(info.branch_kind.as_str())),
                        ("branch_direct", Value::Bool(true)),
                    ]))
                    .with_bases(&question, &target.base),
            );
            continue;
        }

        let Some(branch_end) = info.branch_end.as_deref().filter(|end| *end != target.base) else {
            continue;
        };
        let rejoin = DiagramEdge::new(branch_end, &target.full, EdgeKind::Main).with_attributes(implicit_attributes([
            ("branch", Value::from(info.branch_kind.as_str())),
            ("rejoin", Value::Bool(true)),
        ]));
        push_keyed(cx, rejoin, branch_end, &target.base);
    }
}

/// Adds the arm, direct and rejoin edges of every choice.
pub(super) fn build_choice_edges(
    cx: &mut BuildContext<'_>,
    choice_targets: &IndexMap<String, Reference>,
    default_end: Option<&str>,
) {
    let mut grouped: IndexMap<String, Vec<ChoiceCase>> = IndexMap::new();
    for case in &cx.choice_cases {
        grouped.entry(case.choice_id.clone()).or_default().push(case.clone());
    }

    for (choice, cases) in grouped {
        let fallback = choice_targets.get(&choice).cloned().or_else(|| {
            default_end.map(|end| Reference {
                full: end.to_string(),
                base: end.to_string(),
            })
        });

        for case in cases {
            let kind = case.kind;
            let arm = DiagramEdge::new(&choice, &case.id, kind.edge_kind()).with_attributes(implicit_attributes([
                ("branch", Value::from(kind.as_str())),
                ("branch_case", Value::Bool(true)),
            ]));
            push_keyed(cx, arm, &choice, &case.id);

            let Some(target) = case.resolved_next.clone().or_else(|| fallback.clone()) else {
                continue;
            };

            if case.direct {
                let direct = DiagramEdge::new(&case.id, &target.full, kind.edge_kind()).with_attributes(
                    implicit_attributes([
                        ("branch", Value::from(kind.as_str())),
                        ("branch_direct", Value::Bool(true)),
                    ]),
                );
                push_keyed(cx, direct, &case.id, &target.base);
                continue;
            }

            if case.branch_end == target.base {
                continue;
            }
            let rejoin = DiagramEdge::new(&case.branch_end, &target.full, EdgeKind::Main).with_attributes(
                implicit_attributes([("branch", Value::from(kind.as_str())), ("rejoin", Value::Bool(true))]),
            );
            push_keyed(cx, rejoin, &case.branch_end, &target.base);
        }
    }
}

/// Fills in missing edge bases and reports edges whose endpoints are not
/// nodes.
pub(super) fn finalize_edge_anchors(cx: &mut BuildContext<'_>) {
    let mut dangling = Vec::new();
    for edge in cx.diagram.edges_mut() {
        let from_base = edge.from_base().unwrap_or_else(|| base_anchor(edge.from())).to_string();
        let to_base = edge.to_base().unwrap_or_else(|| base_anchor(edge.to())).to_string();
        edge.set_bases(&from_base, &to_base);

        if !cx.node_ids.contains_key(&from_base) {
            dangling.push(format!("Line references unknown source \"{}\".", edge.from()));
        }
        if !cx.node_ids.contains_key(&to_base) {
            dangling.push(format!("Line references unknown target \"{}\".", edge.to()));
        }
    }

    if !dangling.is_empty() {
        debug!(count = dangling.len(); "Edges with unknown endpoints");
    }
    for message in dangling {
        cx.error(ErrorCode::E302, message, Span::default());
    }
}
