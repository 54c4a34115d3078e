//! Root-level `attach` and `note` blocks.

use drakon_core::{
    semantic::{Attachment, Note},
    value::{BlockStatement, Value},
};

use super::context::{BuildContext, derive_label};

/// `attach "type" "id" { target = "node" ... }`
pub(super) fn handle_attachment(cx: &mut BuildContext<'_>, block: &BlockStatement) {
    let mut attributes = block.parts().attributes;
    let Some(target) = cx.resolve_reference(attributes.get("target"), "Attach target", block.span) else {
        return;
    };
    attributes.insert("target".to_string(), Value::from(target.full.as_str()));

    let kind = block.labels.first().map_or("attachment", String::as_str);
    let id = match block.labels.get(1) {
        Some(id) => id.clone(),
        None => format!("{kind}_{}", cx.diagram.attachments().len() + 1),
    };
    cx.diagram
        .push_attachment(Attachment::new(kind, id, target.full, attributes));
}

/// `note { text = "..." attaches_to = "node" placement = "left" }`
pub(super) fn handle_note(cx: &mut BuildContext<'_>, block: &BlockStatement) {
    let mut attributes = block.parts().attributes;

    let attaches_to = match attributes.get("attaches_to") {
        Some(value @ Value::Str(_)) => cx
            .resolve_reference(Some(value), "Note attaches_to", block.span)
            .map(|reference| reference.full),
        _ => None,
    };
    if let Some(full) = &attaches_to {
        attributes.insert("attaches_to".to_string(), Value::from(full.as_str()));
    }

    let placement = attributes
        .get("placement")
        .and_then(Value::as_str)
        .unwrap_or("right");
    cx.diagram.push_note(Note::new(
        derive_label(&attributes, "Note"),
        placement,
        attaches_to,
    ));
}

#[cfg(test)]
mod tests {
    use drakon_core::{
        semantic::{Diagram, DiagramNode, NodeKind},
        value::{AttributeStatement, Attributes, Statement},
    };

    use super::*;
    use crate::{Span, builder::context::Placement, error::DiagnosticCollector};

    fn with_body(name: &str, labels: &[&str], attributes: &[(&str, &str)]) -> BlockStatement {
        let mut block = BlockStatement::synthetic(name, labels.iter().map(|l| l.to_string()).collect());
        block.body = attributes
            .iter()
            .map(|(key, value)| {
                Statement::Attribute(AttributeStatement {
                    key: key.to_string(),
                    value: Value::from(*value),
                    span: Span::default(),
                })
            })
            .collect();
        block
    }

    fn context(diagnostics: &mut DiagnosticCollector) -> BuildContext<'_> {
        let mut cx = BuildContext::new(diagnostics, Diagram::default(), "d".to_string());
        let node = DiagramNode::new(
            "pay",
            NodeKind::Action,
            "Pay",
            Attributes::new(),
            BlockStatement::synthetic("action", vec!["pay".to_string()]),
        );
        cx.register_node(0, node, Placement::Append);
        cx
    }

    #[test]
    fn test_attachment_ids() {
        let mut diagnostics = DiagnosticCollector::new();
        let mut cx = context(&mut diagnostics);
        handle_attachment(&mut cx, &with_body("attach", &["timer"], &[("target", "pay@right")]));
        handle_attachment(&mut cx, &with_body("attach", &[], &[("target", "pay")]));
        handle_attachment(&mut cx, &with_body("attach", &["shelf", "s1"], &[("target", "pay")]));

        let attachments = cx.diagram.attachments();
        assert_eq!(attachments[0].id(), "timer_1");
        assert_eq!(attachments[0].target(), "pay@right");
        assert_eq!(attachments[1].kind(), "attachment");
        assert_eq!(attachments[1].id(), "attachment_2");
        assert_eq!(attachments[2].id(), "s1");
    }

    #[test]
    fn test_attachment_requires_target() {
        let mut diagnostics = DiagnosticCollector::new();
        {
            let mut cx = context(&mut diagnostics);
            handle_attachment(&mut cx, &with_body("attach", &["timer"], &[]));
            assert!(cx.diagram.attachments().is_empty());
        }
        assert_eq!(
            diagnostics.diagnostics()[0].message(),
            "Attach target must be a non-empty string."
        );
    }

    #[test]
    fn test_note_defaults() {
        let mut diagnostics = DiagnosticCollector::new();
        let mut cx = context(&mut diagnostics);
        handle_note(&mut cx, &with_body("note", &[], &[]));
        handle_note(
            &mut cx,
            &with_body("note", &[], &[("text", "Check stock"), ("attaches_to", "pay"), ("placement", "left")]),
        );

        let notes = cx.diagram.notes();
        assert_eq!(notes[0].text(), "Note");
        assert_eq!(notes[0].placement(), "right");
        assert_eq!(notes[0].attaches_to(), None);
        assert_eq!(notes[1].text(), "Check stock");
        assert_eq!(notes[1].placement(), "left");
        assert_eq!(notes[1].attaches_to(), Some("pay"));
    }
}
