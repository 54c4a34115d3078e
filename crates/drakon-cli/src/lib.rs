//! CLI logic for the DRAKON layout tool.
//!
//! [`run`] reads a DRAKON document, lays it out and writes the TOML layout
//! report.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use drakon::{DiagramBuilder, DrakonError};
use drakon_parser::error::Diagnostic;

use error_adapter::{DiagnosticAdapter, render};

/// Run the DRAKON CLI application
///
/// In strict mode any error diagnostic aborts the run. With
/// [`Args::lenient`] diagnostics are logged as warnings and the report is
/// written for whatever diagram could be built.
///
/// # Errors
///
/// Returns `DrakonError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors (in lenient mode only when no `drakon` block exists)
/// - Layout errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), DrakonError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        lenient = args.lenient;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let mut diagram = if args.lenient {
        match builder.parse_lenient(&source) {
            Ok((diagram, diagnostics)) => {
                report_leniently(&diagnostics, &source);
                diagram
            }
            Err(err) => {
                // No diagram at all; leave the preview placeholder behind.
                let placeholder = builder.render_placeholder(true)?;
                fs::write(&args.output, placeholder)?;
                return Err(err);
            }
        }
    } else {
        builder.parse(&source)?
    };

    let layout = builder.layout(&mut diagram)?;
    let report = builder.render_report(&diagram, &layout)?;

    fs::write(&args.output, report)?;

    info!(output_file = args.output; "Layout report exported successfully");

    Ok(())
}

fn report_leniently(diagnostics: &[Diagnostic], source: &str) {
    if diagnostics.is_empty() {
        return;
    }
    warn!(count = diagnostics.len(); "Continuing despite diagnostics");
    for diagnostic in diagnostics {
        warn!("{}", render(&DiagnosticAdapter::new(diagnostic, source)));
    }
}
