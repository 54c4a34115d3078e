//! The geometry pass: wraps labels and sizes every node.

use log::{debug, trace};

use drakon_core::{
    semantic::{Diagram, NodeGeometry},
    text::TextMeasure,
};

use super::{shapes::shape_spec, wrap::wrap_label};

/// Attaches a [`NodeGeometry`] to every node of `diagram`.
///
/// The label is wrapped to the text width of the node's shape, and the
/// height grows with the line count when the shape allows it.
pub fn prepare_nodes(diagram: &mut Diagram, measure: &dyn TextMeasure) {
    for node in diagram.nodes_mut() {
        let spec = shape_spec(node.kind());
        let lines = wrap_label(node.label(), spec.text_width(), measure);
        let height = spec.height_for(lines.len());
        trace!(id = node.id(), lines = lines.len(), height; "Node geometry");
        node.set_geometry(NodeGeometry::new(
            spec.width(),
            height,
            lines,
            spec.line_height(),
            spec.padding(),
        ));
    }
    debug!(nodes = diagram.nodes().len(); "Node geometry prepared");
}

#[cfg(test)]
mod tests {
    use drakon_core::{
        semantic::{DiagramNode, NodeKind},
        text::FixedWidthMeasure,
        value::{Attributes, BlockStatement},
    };
    use float_cmp::assert_approx_eq;

    use super::*;

    fn node(id: &str, kind: NodeKind, label: &str) -> DiagramNode {
        DiagramNode::new(
            id,
            kind.clone(),
            label,
            Attributes::new(),
            BlockStatement::synthetic(kind.as_str(), vec![id.to_string()]),
        )
    }

    #[test]
    fn test_short_label_keeps_min_height() {
        let mut diagram = Diagram::default();
        diagram.push_node(node("a", NodeKind::Action, "Pay"));
        prepare_nodes(&mut diagram, &FixedWidthMeasure::default());

        let geometry = diagram.nodes()[0].geometry().expect("geometry");
        assert_eq!(geometry.lines(), ["Pay"]);
        assert_approx_eq!(f32, geometry.width(), 240.0);
        assert_approx_eq!(f32, geometry.height(), 140.0);
        assert_approx_eq!(f32, geometry.line_height(), 22.0);
    }

    #[test]
    fn test_long_label_grows() {
        // Text width is 240 - 56 = 184, so 10px characters give 18 per line.
        let label = "aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj kkkk llll";
        let mut diagram = Diagram::default();
        diagram.push_node(node("a", NodeKind::Action, label));
        prepare_nodes(&mut diagram, &FixedWidthMeasure::new(10.0));

        let geometry = diagram.nodes()[0].geometry().expect("geometry");
        assert_eq!(geometry.lines().len(), 4);
        // 28 + 28 + 4 * 22
        assert_approx_eq!(f32, geometry.height(), 144.0);

        let tall = "x\n".repeat(6);
        let mut diagram = Diagram::default();
        diagram.push_node(node("b", NodeKind::Action, tall.trim_end()));
        prepare_nodes(&mut diagram, &FixedWidthMeasure::new(10.0));
        // 28 + 28 + 6 * 22
        assert_approx_eq!(f32, diagram.nodes()[0].geometry().expect("geometry").height(), 188.0);
    }

    #[test]
    fn test_unknown_type_uses_default_shape() {
        let mut diagram = Diagram::default();
        diagram.push_node(node("s", NodeKind::from_name("sticker"), "S"));
        prepare_nodes(&mut diagram, &FixedWidthMeasure::default());

        let geometry = diagram.nodes()[0].geometry().expect("geometry");
        assert_approx_eq!(f32, geometry.height(), 170.0);
        assert_approx_eq!(f32, geometry.padding().left(), 28.0);
    }
}
