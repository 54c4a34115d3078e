//! Diagram nodes.

use std::fmt;

use crate::{
    geometry::Insets,
    value::{Attributes, BlockStatement},
};

/// The type of a diagram node.
///
/// The builder assigns the block name as the node type. Names with a role in
/// graph construction get their own variant; every other name (the decorative
/// icon types such as `comment`, `insertion` or `timer`) is kept verbatim in
/// [`NodeKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Start,
    End,
    Action,
    Question,
    Choice,
    ChoiceCase,
    ChoiceElse,
    Parameters,
    ForEach,
    LoopEnd,
    Other(String),
}

impl NodeKind {
    /// Maps a block name to a node kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "start" => Self::Start,
            "end" => Self::End,
            "action" => Self::Action,
            "question" => Self::Question,
            "choice" => Self::Choice,
            "choice_case" => Self::ChoiceCase,
            "choice_else" => Self::ChoiceElse,
            "parameters" => Self::Parameters,
            "for_each" => Self::ForEach,
            "loop_end" => Self::LoopEnd,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Action => "action",
            Self::Question => "question",
            Self::Choice => "choice",
            Self::ChoiceCase => "choice_case",
            Self::ChoiceElse => "choice_else",
            Self::Parameters => "parameters",
            Self::ForEach => "for_each",
            Self::LoopEnd => "loop_end",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size and text layout of a node, computed by the layout geometry pass.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGeometry {
    width: f32,
    height: f32,
    lines: Vec<String>,
    line_height: f32,
    padding: Insets,
}

impl NodeGeometry {
    pub fn new(width: f32, height: f32, lines: Vec<String>, line_height: f32, padding: Insets) -> Self {
        Self {
            width,
            height,
            lines,
            line_height,
            padding,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// The wrapped label lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }
}

/// A visible node of the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    id: String,
    kind: NodeKind,
    column: usize,
    label: String,
    attributes: Attributes,
    block: BlockStatement,
    geometry: Option<NodeGeometry>,
}

impl DiagramNode {
    /// Creates a node. The column is assigned when the node is registered.
    pub fn new(
        id: impl Into<String>,
        kind: NodeKind,
        label: impl Into<String>,
        attributes: Attributes,
        block: BlockStatement,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            column: 0,
            label: label.into(),
            attributes,
            block,
            geometry: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn set_column(&mut self, column: usize) {
        self.column = column;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// The source block, or a synthetic block for builder-generated nodes.
    pub fn block(&self) -> &BlockStatement {
        &self.block
    }

    pub fn geometry(&self) -> Option<&NodeGeometry> {
        self.geometry.as_ref()
    }

    pub fn set_geometry(&mut self, geometry: NodeGeometry) {
        self.geometry = Some(geometry);
    }

    /// Returns `true` for nodes the builder synthesized (`implicit = true`).
    pub fn is_implicit(&self) -> bool {
        self.attributes
            .get("implicit")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

impl fmt::Display for DiagramNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_round_trips_names() {
        for name in ["start", "question", "choice_else", "loop_end", "timer"] {
            assert_eq!(NodeKind::from_name(name).as_str(), name);
        }
        assert_eq!(
            NodeKind::from_name("shelf"),
            NodeKind::Other("shelf".to_string())
        );
    }

    #[test]
    fn test_implicit_flag() {
        let mut attributes = Attributes::new();
        attributes.insert("implicit".into(), true.into());
        let node = DiagramNode::new(
            "d@end",
            NodeKind::End,
            "End",
            attributes,
            BlockStatement::synthetic("end", vec!["end".into()]),
        );
        assert!(node.is_implicit());
        assert_eq!(node.to_string(), "d@end (end)");
    }
}
