//! Longest-path layering of the diagram graph.

use std::collections::VecDeque;

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use drakon_core::semantic::{Diagram, base_anchor};

/// Computes the depth of every node, keyed by node id in diagram order.
///
/// Seeds are the nodes without incoming edges. A node's depth is the largest
/// `depth(predecessor) + weight` over its incoming edges, where edges flagged
/// `branch_lane` weigh 0 and every other edge weighs 1. Edges to unknown
/// nodes and self loops are ignored. Nodes that are never reached from a
/// seed, such as the members of a cycle, keep whatever depth their processed
/// predecessors gave them, or 0.
pub fn compute_depths(diagram: &Diagram) -> IndexMap<String, usize> {
    let mut graph: DiGraph<&str, usize> = DiGraph::new();
    let indices: IndexMap<&str, NodeIndex> = diagram
        .nodes()
        .iter()
        .map(|node| (node.id(), graph.add_node(node.id())))
        .collect();

    for edge in diagram.edges() {
        let from = edge.from_base().unwrap_or_else(|| base_anchor(edge.from()));
        let to = edge.to_base().unwrap_or_else(|| base_anchor(edge.to()));
        if from == to {
            continue;
        }
        let (Some(&source), Some(&target)) = (indices.get(from), indices.get(to)) else {
            trace!(from, to; "Skipping edge with unknown endpoint");
            continue;
        };
        let weight = if edge.flag("branch_lane") { 0 } else { 1 };
        graph.add_edge(source, target, weight);
    }

    let mut indegree: Vec<usize> = graph
        .node_indices()
        .map(|index| graph.edges_directed(index, Direction::Incoming).count())
        .collect();
    let mut depths: Vec<Option<usize>> = vec![None; graph.node_count()];

    let mut queue: VecDeque<NodeIndex> = graph
        .node_indices()
        .filter(|index| indegree[index.index()] == 0)
        .collect();
    for index in &queue {
        depths[index.index()] = Some(0);
    }

    while let Some(current) = queue.pop_front() {
        let depth = depths[current.index()].unwrap_or_default();
        for edge in graph.edges_directed(current, Direction::Outgoing) {
            let target = edge.target().index();
            let candidate = depth + edge.weight();
            if depths[target].is_none_or(|existing| candidate > existing) {
                depths[target] = Some(candidate);
            }
            indegree[target] -= 1;
            if indegree[target] == 0 {
                queue.push_back(edge.target());
            }
        }
    }

    let unresolved = indegree.iter().filter(|&&count| count > 0).count();
    if unresolved > 0 {
        debug!(unresolved; "Nodes left unlayered by a cycle");
    }

    indices
        .into_iter()
        .map(|(id, index)| (id.to_string(), depths[index.index()].unwrap_or_default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use drakon_core::{
        semantic::{DiagramEdge, DiagramNode, EdgeKind, NodeKind},
        value::{Attributes, BlockStatement, Value},
    };

    use super::*;

    fn diagram(nodes: &[&str], edges: &[(&str, &str)]) -> Diagram {
        let mut diagram = Diagram::default();
        for id in nodes {
            diagram.push_node(DiagramNode::new(
                *id,
                NodeKind::Action,
                *id,
                Attributes::new(),
                BlockStatement::synthetic("action", vec![id.to_string()]),
            ));
        }
        for (from, to) in edges {
            diagram.push_edge(DiagramEdge::new(*from, *to, EdgeKind::Main));
        }
        diagram
    }

    fn depths_of(diagram: &Diagram) -> Vec<(String, usize)> {
        compute_depths(diagram).into_iter().collect()
    }

    #[test]
    fn test_chain() {
        let d = diagram(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let depths = compute_depths(&d);
        assert_eq!(depths["a"], 0);
        assert_eq!(depths["b"], 1);
        assert_eq!(depths["c"], 2);
    }

    #[test]
    fn test_diamond_takes_longest_path() {
        // a -> b -> d, a -> c -> x -> d: d sits below the deeper parent.
        let d = diagram(
            &["a", "b", "c", "x", "d"],
            &[("a", "b"), ("a", "c"), ("c", "x"), ("b", "d"), ("x", "d")],
        );
        let depths = compute_depths(&d);
        assert_eq!(depths["b"], 1);
        assert_eq!(depths["x"], 2);
        assert_eq!(depths["d"], 3);
    }

    #[test]
    fn test_plain_diamond() {
        let d = diagram(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        let depths = compute_depths(&d);
        assert_eq!(depths["d"], depths["b"].max(depths["c"]) + 1);
    }

    #[test]
    fn test_branch_lane_edges_weigh_nothing() {
        let mut d = diagram(&["q", "yes_head", "after"], &[("yes_head", "after")]);
        let mut attributes = Attributes::new();
        attributes.insert("branch_lane".to_string(), Value::Bool(true));
        d.push_edge(DiagramEdge::new("q", "yes_head", EdgeKind::Yes).with_attributes(attributes));

        let depths = compute_depths(&d);
        assert_eq!(depths["q"], 0);
        assert_eq!(depths["yes_head"], 0);
        assert_eq!(depths["after"], 1);
    }

    #[test]
    fn test_anchors_self_loops_and_dangling_edges() {
        let d = diagram(
            &["a", "b"],
            &[("a@right", "b@left"), ("b", "b"), ("b", "ghost"), ("ghost", "a")],
        );
        assert_eq!(depths_of(&d), [("a".to_string(), 0), ("b".to_string(), 1)]);
    }

    #[test]
    fn test_cycle_members_default_to_zero() {
        let d = diagram(&["a", "b", "c"], &[("a", "b"), ("b", "a"), ("c", "a")]);
        let depths = compute_depths(&d);
        assert_eq!(depths["c"], 0);
        // Relaxed from c but never dequeued.
        assert_eq!(depths["a"], 1);
        assert_eq!(depths["b"], 0);
    }

    #[test]
    fn test_parallel_edges_are_counted() {
        let d = diagram(&["a", "b", "c"], &[("a", "c"), ("a", "c"), ("b", "c")]);
        let depths = compute_depths(&d);
        assert_eq!(depths["c"], 1);
    }
}
