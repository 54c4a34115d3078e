//! Semantic diagram model types.
//!
//! These types are the output of the diagram builder and the input of the
//! layout engine.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ lexer
//! Tokens
//!     ↓ parser
//! Statements (value module)
//!     ↓ builder
//! Semantic Model (these types) - nodes, edges, attachments, notes
//!     ↓ layout
//! Node geometry + positions
//! ```
//!
//! # Organization
//!
//! - [`diagram`] - [`Diagram`], [`Attachment`], [`Note`]
//! - [`node`] - [`DiagramNode`], [`NodeKind`], [`NodeGeometry`]
//! - [`edge`] - [`DiagramEdge`], [`EdgeKind`]

pub mod diagram;
pub mod edge;
pub mod node;

pub use diagram::*;
pub use edge::*;
pub use node::*;

/// Strips an `@anchor` suffix from a node reference.
///
/// ```
/// # use drakon_core::semantic::base_anchor;
/// assert_eq!(base_anchor("check@end"), "check");
/// assert_eq!(base_anchor("check"), "check");
/// ```
pub fn base_anchor(reference: &str) -> &str {
    reference
        .split_once('@')
        .map_or(reference, |(head, _)| head)
}
