//! Error and diagnostic system for the DRAKON parser.
//!
//! Every stage of the pipeline reports problems as [`Diagnostic`]s into one
//! shared [`DiagnosticCollector`]. Nothing aborts on a recoverable problem:
//! the tokenizer skips the offending character, the parser skips the
//! offending token and the builder drops the offending construct.
//!
//! # Example
//!
//! ```
//! # use drakon_parser::error::{Diagnostic, ErrorCode};
//! # use drakon_parser::Span;
//! let diag = Diagnostic::error("Duplicate node id \"a\".")
//!     .with_code(ErrorCode::E301)
//!     .with_label(Span::new(40..52), "duplicate definition")
//!     .with_secondary_label(Span::new(10..22), "first defined here");
//! assert_eq!(diag.to_string(), "error[E301]: Duplicate node id \"a\".");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
