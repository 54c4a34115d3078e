//! TOML layout report.
//!
//! The report lists the canvas size, the columns, every node with its
//! wrapped label and position, and every edge. When there is nothing to draw
//! it carries a placeholder `message` instead.

use log::{debug, info};
use serde::Serialize;

use drakon_core::semantic::{Diagram, DiagramEdge, DiagramNode};

use super::{Error, Exporter};
use crate::layout::LayoutResult;

/// Placeholder when the source has errors and no diagram could be drawn.
pub const SYNTAX_ERROR_MESSAGE: &str = "Fix syntax errors in the HCL diagram to see a preview.";

/// Placeholder when the diagram has no nodes.
pub const EMPTY_DIAGRAM_MESSAGE: &str = "Define blocks using the HCL-based DRAKON DSL.";

/// Picks the placeholder message for an empty preview.
pub fn placeholder_message(has_errors: bool) -> &'static str {
    if has_errors {
        SYNTAX_ERROR_MESSAGE
    } else {
        EMPTY_DIAGRAM_MESSAGE
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    canvas: Canvas,
    columns: Vec<ColumnEntry>,
    nodes: Vec<NodeEntry<'a>>,
    edges: Vec<EdgeEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct Canvas {
    width: f32,
    height: f32,
}

#[derive(Debug, Serialize)]
struct ColumnEntry {
    index: usize,
    x: f32,
    width: f32,
}

#[derive(Debug, Serialize)]
struct NodeEntry<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    column: usize,
    depth: usize,
    label: &'a str,
    lines: &'a [String],
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

#[derive(Debug, Serialize)]
struct EdgeEntry<'a> {
    from: &'a str,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_base: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_base: Option<&'a str>,
    kind: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    label: &'a str,
    implicit: bool,
}

impl<'a> NodeEntry<'a> {
    fn new(node: &'a DiagramNode, layout: &LayoutResult) -> Self {
        let position = layout.position(node.id()).unwrap_or_default();
        let (lines, width, height) = node
            .geometry()
            .map_or((&[][..], 0.0, 0.0), |geometry| {
                (geometry.lines(), geometry.width(), geometry.height())
            });
        Self {
            id: node.id(),
            kind: node.kind().as_str(),
            column: node.column(),
            depth: layout.depth(node.id()).unwrap_or_default(),
            label: node.label(),
            lines,
            x: position.x(),
            y: position.y(),
            width,
            height,
        }
    }
}

impl<'a> From<&'a DiagramEdge> for EdgeEntry<'a> {
    fn from(edge: &'a DiagramEdge) -> Self {
        Self {
            from: edge.from(),
            to: edge.to(),
            from_base: edge.from_base(),
            to_base: edge.to_base(),
            kind: edge.kind().as_str(),
            label: edge.label(),
            implicit: edge.is_implicit(),
        }
    }
}

/// Writes the layout report into an in-memory TOML document.
///
/// # Examples
///
/// ```
/// use drakon::export::{Exporter, report::TomlReport};
///
/// let mut report = TomlReport::new();
/// report.export_placeholder("Nothing to show").expect("export");
/// assert!(report.as_str().contains("message = \"Nothing to show\""));
/// ```
#[derive(Debug, Default)]
pub struct TomlReport {
    output: String,
}

impl TomlReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}

impl Exporter for TomlReport {
    fn export_layout(&mut self, diagram: &Diagram, layout: &LayoutResult) -> Result<(), Error> {
        info!(title = diagram.title(); "Exporting layout report");
        let message = diagram.is_empty().then(|| placeholder_message(false));
        let report = Report {
            title: diagram.title(),
            message,
            canvas: Canvas {
                width: layout.size().width(),
                height: layout.size().height(),
            },
            columns: layout
                .columns()
                .iter()
                .map(|column| ColumnEntry {
                    index: column.index(),
                    x: column.x(),
                    width: column.width(),
                })
                .collect(),
            nodes: diagram
                .nodes()
                .iter()
                .map(|node| NodeEntry::new(node, layout))
                .collect(),
            edges: diagram.edges().iter().map(EdgeEntry::from).collect(),
        };
        self.output = toml::to_string_pretty(&report)?;
        debug!(bytes = self.output.len(); "Layout report written");
        Ok(())
    }

    fn export_placeholder(&mut self, message: &str) -> Result<(), Error> {
        info!(message; "Exporting placeholder report");
        let report = Report {
            title: "",
            message: Some(message),
            canvas: Canvas {
                width: 0.0,
                height: 0.0,
            },
            columns: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        };
        self.output = toml::to_string_pretty(&report)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use drakon_core::text::FixedWidthMeasure;

    use super::*;
    use crate::layout::{Engine, prepare_nodes};

    fn report_for(source: &str) -> toml::Table {
        let mut diagram = drakon_parser::parse(source)
            .into_result()
            .expect("Failed to parse");
        prepare_nodes(&mut diagram, &FixedWidthMeasure::default());
        let layout = Engine::default().calculate(&diagram).expect("Failed to lay out");

        let mut report = TomlReport::new();
        report.export_layout(&diagram, &layout).expect("Failed to export");
        toml::from_str(report.as_str()).expect("report is valid TOML")
    }

    #[test]
    fn test_report_contents() {
        let table = report_for(r#"drakon "d" { title = "Demo" action "a" { text = "Do it" } }"#);

        assert_eq!(table["title"].as_str(), Some("Demo"));
        assert!(table.get("message").is_none());
        assert!(table["canvas"]["width"].as_float().is_some());

        let nodes = table["nodes"].as_array().expect("nodes");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1]["id"].as_str(), Some("a"));
        assert_eq!(nodes[1]["type"].as_str(), Some("action"));
        assert_eq!(nodes[1]["depth"].as_integer(), Some(1));
        assert_eq!(nodes[1]["lines"].as_array().map(Vec::len), Some(1));

        let edges = table["edges"].as_array().expect("edges");
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0]["kind"].as_str(), Some("main"));
        assert_eq!(edges[0]["implicit"].as_bool(), Some(true));
        assert!(edges[0].get("label").is_none());
    }

    #[test]
    fn test_placeholder_report() {
        let mut report = TomlReport::new();
        report
            .export_placeholder(placeholder_message(true))
            .expect("Failed to export");
        let table: toml::Table = toml::from_str(report.as_str()).expect("valid TOML");
        assert_eq!(table["message"].as_str(), Some(SYNTAX_ERROR_MESSAGE));
        assert_eq!(table["nodes"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_empty_diagram_carries_message() {
        let diagram = Diagram::default();
        let layout = Engine::default().calculate(&diagram).expect("Failed to lay out");
        let mut report = TomlReport::new();
        report.export_layout(&diagram, &layout).expect("Failed to export");
        assert!(report.as_str().contains(EMPTY_DIAGRAM_MESSAGE));
    }

    #[test]
    fn test_placeholder_message() {
        assert_eq!(placeholder_message(false), EMPTY_DIAGRAM_MESSAGE);
        assert_eq!(placeholder_message(true), SYNTAX_ERROR_MESSAGE);
    }
}
