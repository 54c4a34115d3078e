//! DRAKON Core Types and Definitions
//!
//! This crate provides the foundational types shared by the DRAKON diagram
//! pipeline. It includes:
//!
//! - **Spans**: Byte ranges into the source text ([`span::Span`])
//! - **Syntax values**: The parsed statement tree ([`value`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Semantic**: The built diagram model ([`semantic`] module)
//! - **Text**: Text width measurement used for label wrapping ([`text`] module)

pub mod geometry;
pub mod semantic;
pub mod span;
pub mod text;
pub mod value;
