//! Layout engine for positioning diagram nodes.
//!
//! Layout runs in two independent passes over a built diagram.
//!
//! # Pipeline Position
//!
//! ```text
//! Semantic Model (Diagram)
//!     ↓ prepare_nodes (geometry pass)
//! Diagram with NodeGeometry
//!     ↓ Engine::calculate (depth, column and row passes)
//! LayoutResult
//!     ↓ export
//! Output
//! ```
//!
//! # Submodules
//!
//! - [`shapes`] - Per-type node sizes and text metrics
//! - [`wrap`] - Word wrapping of labels against a [`TextMeasure`]
//! - [`depth`] - Longest-path layering of the edge graph
//!
//! [`TextMeasure`]: drakon_core::text::TextMeasure

pub mod depth;
mod engine;
mod prepare;
pub mod shapes;
pub mod wrap;

pub use engine::{ColumnLayout, Engine, LayoutResult};
pub use prepare::prepare_nodes;
