//! Column and row placement.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, info};

use drakon_core::{
    geometry::{Point, Size},
    semantic::{Diagram, NodeKind},
};

use super::depth::compute_depths;
use crate::{DrakonError, config::LayoutConfig};

/// A laid-out column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    index: usize,
    x: f32,
    width: f32,
    nodes: Vec<String>,
}

impl ColumnLayout {
    /// The column number the builder assigned.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Horizontal center of the column.
    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Node ids ordered by depth, then by diagram order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }
}

/// Positions of every node plus the canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    size: Size,
    columns: Vec<ColumnLayout>,
    positions: IndexMap<String, Point>,
    depths: IndexMap<String, usize>,
}

impl LayoutResult {
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn columns(&self) -> &[ColumnLayout] {
        &self.columns
    }

    /// Node centers keyed by node id, in diagram order.
    pub fn positions(&self) -> &IndexMap<String, Point> {
        &self.positions
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn depths(&self) -> &IndexMap<String, usize> {
        &self.depths
    }

    pub fn depth(&self, id: &str) -> Option<usize> {
        self.depths.get(id).copied()
    }
}

/// Places prepared nodes on the canvas.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: LayoutConfig,
}

impl Engine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Computes depths, columns and rows for `diagram`.
    ///
    /// Columns run left to right in ascending order. Rows are depth bands
    /// stacked top to bottom; each band is as tall as its tallest node and a
    /// node is centered in its band. Parameters nodes share the band of the
    /// start node.
    ///
    /// # Errors
    ///
    /// Returns [`DrakonError::Layout`] if a node has no geometry.
    pub fn calculate(&self, diagram: &Diagram) -> Result<LayoutResult, DrakonError> {
        info!(nodes = diagram.nodes().len(); "Calculating layout");
        let config = &self.config;

        let mut sizes = Vec::with_capacity(diagram.nodes().len());
        for node in diagram.nodes() {
            let geometry = node.geometry().ok_or_else(|| {
                DrakonError::Layout(format!(
                    "Node \"{}\" has no geometry; prepare nodes before layout",
                    node.id()
                ))
            })?;
            sizes.push(Size::new(geometry.width(), geometry.height()));
        }

        let depths = compute_depths(diagram);
        let depth_of = |id: &str| depths.get(id).copied().unwrap_or_default();

        let start_depth = diagram
            .nodes_of_kind(&NodeKind::Start)
            .next()
            .map(|start| depth_of(start.id()));
        let row_of = |index: usize| {
            let node = &diagram.nodes()[index];
            match (node.kind(), start_depth) {
                (NodeKind::Parameters, Some(row)) => row,
                _ => depth_of(node.id()),
            }
        };

        // Columns.
        let mut by_column: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (index, node) in diagram.nodes().iter().enumerate() {
            by_column.entry(node.column()).or_default().push(index);
        }

        let mut columns = Vec::with_capacity(by_column.len());
        let mut column_cells = IndexMap::new();
        let mut current_x = config.side_margin();
        for (column, mut members) in by_column {
            members.sort_by_key(|&index| (depth_of(diagram.nodes()[index].id()), index));

            let widest = members
                .iter()
                .map(|&index| sizes[index].width())
                .fold(config.min_node_width(), f32::max);
            let width = (widest + config.column_padding()).max(config.min_column_width());
            let x = current_x + width / 2.0;
            current_x += width + config.column_gap();

            column_cells.insert(column, (x, width));
            columns.push(ColumnLayout {
                index: column,
                x,
                width,
                nodes: members
                    .iter()
                    .map(|&index| diagram.nodes()[index].id().to_string())
                    .collect(),
            });
        }

        // Rows.
        let mut row_heights: BTreeMap<usize, f32> = BTreeMap::new();
        for (index, size) in sizes.iter().enumerate() {
            let height = row_heights.entry(row_of(index)).or_default();
            *height = height.max(size.height());
        }

        let mut row_centers = BTreeMap::new();
        let mut current_y = config.top_margin();
        for (row, height) in &row_heights {
            row_centers.insert(*row, current_y + height / 2.0);
            current_y += height + config.row_gap();
        }

        let positions: IndexMap<String, Point> = diagram
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let x = column_cells.get(&node.column()).map_or(0.0, |&(x, _)| x);
                let y = row_centers.get(&row_of(index)).copied().unwrap_or_default();
                (node.id().to_string(), Point::new(x, y))
            })
            .collect();

        // Every node owns the cell spanned by its column and its row band.
        let content = diagram
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let &(x, width) = column_cells.get(&node.column())?;
                let row = row_of(index);
                let y = row_centers.get(&row).copied()?;
                let height = row_heights.get(&row).copied()?;
                Some(Point::new(x, y).to_bounds(Size::new(width, height)))
            })
            .reduce(|merged, cell| merged.merge(&cell));
        let (content_right, content_bottom) = content.map_or(
            (config.side_margin() - config.column_gap(), config.top_margin()),
            |bounds| (bounds.max_x(), bounds.max_y()),
        );

        let width = (content_right + config.side_margin()).max(config.min_width());
        let height = (content_bottom + config.bottom_margin()).max(config.min_height());

        debug!(
            columns = columns.len(),
            rows = row_heights.len(),
            width,
            height;
            "Layout calculated"
        );

        Ok(LayoutResult {
            size: Size::new(width, height),
            columns,
            positions,
            depths,
        })
    }
}
