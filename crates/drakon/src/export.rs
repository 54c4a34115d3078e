//! Export functionality for DRAKON diagrams.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! turning a laid-out diagram into an output format. It is the final stage in
//! the processing pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ parse
//! Semantic Model
//!     ↓ layout
//! LayoutResult
//!     ↓ export (this module)
//! Output
//! ```
//!
//! # Available Backends
//!
//! - [`report`]: TOML layout report via [`report::TomlReport`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], which converts into
//! [`DrakonError::Export`] at the crate boundary.
//!
//! [`DrakonError::Export`]: crate::DrakonError::Export

/// TOML layout report backend.
pub mod report;

use drakon_core::semantic::Diagram;

use crate::layout::LayoutResult;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Exports a diagram together with its computed layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] if the output cannot be produced.
    fn export_layout(&mut self, diagram: &Diagram, layout: &LayoutResult) -> Result<(), Error>;

    /// Exports the placeholder shown when there is nothing to draw.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] if the output cannot be produced.
    fn export_placeholder(&mut self, message: &str) -> Result<(), Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// The report could not be serialized.
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "Serialization error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialize(err)
    }
}
