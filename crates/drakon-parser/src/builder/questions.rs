//! `question` branches.
//!
//! A question continues downwards along its default outcome. At most one of
//! `yes` and `no` may hold blocks; those are laid out in a branch column and
//! rejoin the default path at the question's `next` target.

use drakon_core::{
    semantic::{DiagramEdge, base_anchor},
    value::{Attributes, BlockStatement, StatementParts, Value},
};
use log::debug;

use super::{
    context::{BranchKind, BuildContext, QuestionBranch, implicit_attributes},
    nodes::create_column_node,
};
use crate::{Span, error::ErrorCode};

/// The contents of a `yes` or `no` attribute.
struct BranchBody<'a> {
    kind: BranchKind,
    /// `false` for an empty `{}` or `[]`.
    has_statements: bool,
    attributes: Attributes,
    blocks: Vec<&'a BlockStatement>,
}

impl<'a> BranchBody<'a> {
    fn read(attributes: &'a Attributes, kind: BranchKind) -> Option<Self> {
        let value = attributes.get(kind.as_str())?;
        if let Some(statements) = value.as_statements() {
            let parts = StatementParts::split(statements);
            return Some(Self {
                kind,
                has_statements: !statements.is_empty(),
                attributes: parts.attributes,
                blocks: parts.blocks,
            });
        }
        // An attribute-only object such as `yes = { column = 2 }`.
        value.as_object().map(|object| Self {
            kind,
            has_statements: true,
            attributes: object.clone(),
            blocks: Vec::new(),
        })
    }
}

/// Highest column index a branch may request.
const MAX_BRANCH_COLUMN: usize = 1024;

/// The column requested by a branch's `column` attribute.
///
/// Returns `None` when there is no whole, non-negative number to honour and
/// `Some(Err(requested))` when the number lies past [`MAX_BRANCH_COLUMN`].
fn requested_column(attributes: &Attributes) -> Option<Result<usize, f64>> {
    let column = attributes.get("column").and_then(Value::as_number)?;
    if !(column.is_finite() && column >= 0.0 && column.fract() == 0.0) {
        return None;
    }
    if column > MAX_BRANCH_COLUMN as f64 {
        return Some(Err(column));
    }
    Some(Ok(column as usize))
}

fn branch_summary(entries: Vec<(&str, Value)>) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
    )
}

/// Expands the `yes` and `no` attributes of question `id`.
pub(super) fn process_question_branches(
    cx: &mut BuildContext<'_>,
    id: &str,
    attributes: &Attributes,
    span: Span,
) {
    let next = attributes
        .get("next")
        .and_then(Value::as_trimmed_str)
        .map(str::to_string);

    let yes = BranchBody::read(attributes, BranchKind::Yes);
    let no = BranchBody::read(attributes, BranchKind::No);

    if yes.is_none() && no.is_none() {
        cx.question_branches.insert(
            id.to_string(),
            QuestionBranch {
                branch_kind: BranchKind::No,
                branch_end: None,
                default_kind: BranchKind::Yes,
                direct: true,
                next,
                resolved_next: None,
                span,
            },
        );
        cx.set_node_attribute(
            id,
            BranchKind::No.as_str(),
            branch_summary(vec![("direct", Value::Bool(true)), ("label", Value::from("No"))]),
        );
        return;
    }

    for body in [&yes, &no].into_iter().flatten() {
        if !body.has_statements {
            cx.error(
                ErrorCode::E306,
                format!(
                    "Question \"{id}\" branch \"{}\" must include at least one block.",
                    body.kind.as_str()
                ),
                span,
            );
        }
    }

    let yes = yes.filter(|body| body.has_statements);
    let no = no.filter(|body| body.has_statements);

    let body = match (yes, no) {
        (None, None) => return,
        (Some(_), Some(_)) => {
            cx.error(
                ErrorCode::E306,
                format!(
                    "Question \"{id}\" cannot define both \"yes\" and \"no\" branch blocks. Choose one explicit branch."
                ),
                span,
            );
            return;
        }
        (Some(body), None) | (None, Some(body)) => body,
    };

    let kind = body.kind;
    if body.blocks.is_empty() {
        cx.question_branches.insert(
            id.to_string(),
            QuestionBranch {
                branch_kind: kind,
                branch_end: None,
                default_kind: kind.opposite(),
                direct: true,
                next,
                resolved_next: None,
                span,
            },
        );
        cx.set_node_attribute(
            id,
            kind.as_str(),
            branch_summary(vec![("direct", Value::Bool(true)), ("label", Value::from(kind.label()))]),
        );
        return;
    }

    let branch_column = match requested_column(&body.attributes) {
        Some(Ok(requested)) => requested,
        Some(Err(requested)) => {
            cx.warning(
                ErrorCode::E306,
                format!(
                    "Question \"{id}\" branch \"{}\" requests column {requested}, past the last usable column {MAX_BRANCH_COLUMN}. The branch gets a new column instead.",
                    kind.as_str()
                ),
                span,
            );
            cx.allocate_column()
        }
        None => cx.allocate_column(),
    };
    cx.ensure_column(branch_column);
    let first_index = cx.column_len(branch_column);

    for child in &body.blocks {
        if matches!(child.name.as_str(), "line" | "attach" | "note") {
            cx.error(
                ErrorCode::E305,
                format!(
                    "Block \"{}\" is not supported inside question branch \"{}\" of \"{id}\".",
                    child.name,
                    kind.as_str()
                ),
                child.span,
            );
            continue;
        }
        create_column_node(cx, branch_column, child);
    }

    let created = &cx.column_nodes(branch_column)[first_index.min(cx.column_len(branch_column))..];
    let (Some(first), Some(last)) = (created.first().cloned(), created.last().cloned()) else {
        cx.error(
            ErrorCode::E307,
            format!(
                "Question \"{id}\" branch \"{}\" did not create any nodes.",
                kind.as_str()
            ),
            span,
        );
        return;
    };

    debug!(question = id, branch = kind.as_str(), column = branch_column; "Expanded question branch");

    let already_linked = cx.diagram.edges().iter().any(|edge| {
        edge.from_base().unwrap_or_else(|| base_anchor(edge.from())) == id
            && edge.to_base().unwrap_or_else(|| base_anchor(edge.to())) == first
    });
    if !already_linked {
        cx.diagram.push_edge(
            DiagramEdge::new(id, &first, kind.edge_kind())
                .with_label(kind.label())
                .with_attributes(implicit_attributes([
                    ("branch", Value::from(kind.as_str())),
                    ("branch_lane", Value::Bool(true)),
                ]))
                .with_bases(id, &first),
        );
    }

    cx.question_branches.insert(
        id.to_string(),
        QuestionBranch {
            branch_kind: kind,
            branch_end: Some(last.clone()),
            default_kind: kind.opposite(),
            direct: false,
            next,
            resolved_next: None,
            span,
        },
    );
    cx.set_node_attribute(
        id,
        kind.as_str(),
        branch_summary(vec![
            ("column", Value::Num(branch_column as f64)),
            ("start", Value::from(first)),
            ("end", Value::from(last)),
        ]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_column() {
        let mut attributes = Attributes::new();
        assert_eq!(requested_column(&attributes), None);
        attributes.insert("column".to_string(), Value::Num(3.0));
        assert_eq!(requested_column(&attributes), Some(Ok(3)));
        attributes.insert("column".to_string(), Value::Num(1024.0));
        assert_eq!(requested_column(&attributes), Some(Ok(1024)));
        attributes.insert("column".to_string(), Value::Num(1e23));
        assert_eq!(requested_column(&attributes), Some(Err(1e23)));
        attributes.insert("column".to_string(), Value::Num(1.5));
        assert_eq!(requested_column(&attributes), None);
        attributes.insert("column".to_string(), Value::Num(-1.0));
        assert_eq!(requested_column(&attributes), None);
        attributes.insert("column".to_string(), Value::from("2"));
        assert_eq!(requested_column(&attributes), None);
    }

    #[test]
    fn test_branch_body_reads_attribute_only_object() {
        let mut object = Attributes::new();
        object.insert("column".to_string(), Value::Num(2.0));
        let mut attributes = Attributes::new();
        attributes.insert("yes".to_string(), Value::Object(object));
        attributes.insert("no".to_string(), Value::List(Vec::new()));

        let yes = BranchBody::read(&attributes, BranchKind::Yes).expect("yes body");
        assert!(yes.has_statements);
        assert!(yes.blocks.is_empty());

        let no = BranchBody::read(&attributes, BranchKind::No).expect("no body");
        assert!(!no.has_statements);

        attributes.insert("yes".to_string(), Value::from("text"));
        assert!(BranchBody::read(&attributes, BranchKind::Yes).is_none());
    }
}
