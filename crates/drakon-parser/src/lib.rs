//! # DRAKON Parser
//!
//! Parser for a DRAKON flowchart language written in an HCL-like block
//! syntax. The crate turns source text into a semantic
//! [`Diagram`](drakon_core::semantic::Diagram) in three stages:
//!
//! 1. [`lexer::tokenize`] converts text into tokens,
//! 2. [`parser::parse`] builds a statement tree from tokens,
//! 3. [`builder::build`] turns the `drakon` block into nodes and edges.
//!
//! Every stage reports problems into one shared
//! [`DiagnosticCollector`](error::DiagnosticCollector) and keeps going, so a
//! single run surfaces every problem in the source.
//!
//! ## Usage
//!
//! ```
//! let source = r#"
//!     drakon "checkout" {
//!         title = "Checkout"
//!         action "pay" { text = "Take payment" }
//!     }
//! "#;
//!
//! let parsed = drakon_parser::parse(source);
//! assert!(!parsed.has_errors());
//! let diagram = parsed.diagram().expect("diagram");
//! assert_eq!(diagram.title(), "Checkout");
//! ```

pub mod builder;
pub mod error;
pub mod lexer;
mod line_index;
pub mod parser;
mod text;
pub mod tokens;

pub use drakon_core::span::Span;

use drakon_core::semantic::Diagram;
use log::{debug, info};

use error::{Diagnostic, DiagnosticCollector, ParseError};

/// The outcome of parsing a source file.
///
/// A diagram may be present even when errors were reported; it then holds
/// whatever the builder could salvage.
#[derive(Debug, Clone)]
pub struct Parsed {
    diagram: Option<Diagram>,
    diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    pub fn diagram(&self) -> Option<&Diagram> {
        self.diagram.as_ref()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity().is_error())
    }

    /// Returns the diagram only if no stage reported an error.
    pub fn into_result(self) -> Result<Diagram, ParseError> {
        if self.has_errors() {
            return Err(ParseError::new(self.diagnostics));
        }
        self.diagram.ok_or_else(|| ParseError::new(self.diagnostics))
    }

    /// Returns the diagram and the diagnostics, errors included.
    pub fn into_parts(self) -> (Option<Diagram>, Vec<Diagnostic>) {
        (self.diagram, self.diagnostics)
    }
}

/// Runs the whole pipeline over `source`.
///
/// All stages run even when an earlier one reported errors.
pub fn parse(source: &str) -> Parsed {
    info!(bytes = source.len(); "Parsing DRAKON source");
    let mut diagnostics = DiagnosticCollector::new();

    let tokens = lexer::tokenize(source, &mut diagnostics);
    let statements = parser::parse(&tokens, &mut diagnostics);
    let diagram = builder::build(&statements, &mut diagnostics);

    debug!(
        statements = statements.len(),
        diagnostics = diagnostics.len();
        "Parsing finished"
    );
    Parsed {
        diagram,
        diagnostics: diagnostics.into_diagnostics(),
    }
}
