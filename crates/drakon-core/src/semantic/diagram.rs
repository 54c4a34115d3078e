//! The diagram aggregate.

use crate::{
    semantic::{DiagramEdge, DiagramNode, NodeKind},
    value::Attributes,
};

/// A decoration attached to a node (`attach "type" "id" { target = ... }`).
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    kind: String,
    id: String,
    target: String,
    attributes: Attributes,
}

impl Attachment {
    pub fn new(
        kind: impl Into<String>,
        id: impl Into<String>,
        target: impl Into<String>,
        attributes: Attributes,
    ) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            target: target.into(),
            attributes,
        }
    }

    /// The attachment type, taken from the block's first label.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The resolved target reference, anchor suffix included.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// A free-standing text note, optionally pinned to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    text: String,
    placement: String,
    attaches_to: Option<String>,
}

impl Note {
    pub fn new(text: impl Into<String>, placement: impl Into<String>, attaches_to: Option<String>) -> Self {
        Self {
            text: text.into(),
            placement: placement.into(),
            attaches_to,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placement(&self) -> &str {
        &self.placement
    }

    pub fn attaches_to(&self) -> Option<&str> {
        self.attaches_to.as_deref()
    }
}

/// A fully built diagram: nodes in placement order, edges in creation order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagram {
    title: String,
    metadata: Attributes,
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
    attachments: Vec<Attachment>,
    notes: Vec<Note>,
}

impl Diagram {
    pub fn new(title: impl Into<String>, metadata: Attributes) -> Self {
        Self {
            title: title.into(),
            metadata,
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Root attributes other than `parameters`.
    pub fn metadata(&self) -> &Attributes {
        &self.metadata
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [DiagramNode] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [DiagramEdge] {
        &mut self.edges
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn push_node(&mut self, node: DiagramNode) {
        self.nodes.push(node);
    }

    pub fn prepend_node(&mut self, node: DiagramNode) {
        self.nodes.insert(0, node);
    }

    pub fn push_edge(&mut self, edge: DiagramEdge) {
        self.edges.push(edge);
    }

    pub fn push_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn push_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut DiagramNode> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    /// Iterates over the nodes of a given kind in diagram order.
    pub fn nodes_of_kind<'a>(&'a self, kind: &'a NodeKind) -> impl Iterator<Item = &'a DiagramNode> + 'a {
        self.nodes.iter().filter(move |node| node.kind() == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::BlockStatement;

    fn node(id: &str, kind: NodeKind) -> DiagramNode {
        DiagramNode::new(
            id,
            kind.clone(),
            id,
            Attributes::new(),
            BlockStatement::synthetic(kind.as_str(), vec![id.to_string()]),
        )
    }

    #[test]
    fn test_prepend_keeps_start_first() {
        let mut diagram = Diagram::new("D", Attributes::new());
        diagram.push_node(node("a", NodeKind::Action));
        diagram.prepend_node(node("d@start", NodeKind::Start));

        let ids: Vec<_> = diagram.nodes().iter().map(|n| n.id()).collect();
        assert_eq!(ids, ["d@start", "a"]);
        assert_eq!(diagram.nodes_of_kind(&NodeKind::Start).count(), 1);
    }

    #[test]
    fn test_node_lookup_and_mutation() {
        let mut diagram = Diagram::new("D", Attributes::new());
        diagram.push_node(node("a", NodeKind::Action));
        diagram
            .node_mut("a")
            .expect("node a exists")
            .set_label("Renamed");

        assert_eq!(diagram.node("a").map(|n| n.label()), Some("Renamed"));
        assert!(diagram.node("missing").is_none());
        assert!(!diagram.is_empty());
    }
}
