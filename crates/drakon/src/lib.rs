//! DRAKON - parsing and layout for DRAKON flowchart diagrams.
//!
//! Diagrams are written in an HCL-like block language. This crate ties the
//! parser to the layout engine and the report exporter.

pub mod config;

mod error;
pub mod export;
pub mod layout;

pub use drakon_core::{geometry, semantic, text};

pub use error::DrakonError;

use log::{debug, info, trace};

use config::AppConfig;
use drakon_parser::error::{Diagnostic, ParseError};
use export::{Exporter, report::TomlReport};
use layout::LayoutResult;

/// Builder for parsing and laying out DRAKON diagrams.
///
/// # Examples
///
/// ```rust
/// use drakon::{DiagramBuilder, config::{AppConfig, LayoutConfig, TextConfig}};
///
/// let source = r#"drakon "greet" { action "hello" { text = "Say hello" } }"#;
///
/// let config = AppConfig::new(LayoutConfig::default(), TextConfig::default().with_fixed_width(8.0));
/// let builder = DiagramBuilder::new(config);
///
/// let mut diagram = builder.parse(source).expect("Failed to parse");
/// let layout = builder.layout(&mut diagram).expect("Failed to lay out");
/// assert_eq!(layout.positions().len(), 3);
///
/// let report = builder.render_report(&diagram, &layout).expect("Failed to export");
/// assert!(report.contains("id = \"hello\""));
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source code into a diagram, failing on any error diagnostic.
    ///
    /// # Errors
    ///
    /// Returns [`DrakonError::Parse`] with every diagnostic when the
    /// tokenizer, parser or builder reported an error.
    pub fn parse(&self, source: &str) -> Result<semantic::Diagram, DrakonError> {
        info!("Parsing diagram");

        let diagram = drakon_parser::parse(source)
            .into_result()
            .map_err(|err| DrakonError::new_parse_error(err, source))?;

        debug!("Diagram parsed successfully");
        trace!(diagram:?; "Parsed diagram");

        Ok(diagram)
    }

    /// Parse source code, keeping a degraded diagram despite errors.
    ///
    /// Returns the diagram along with all diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`DrakonError::Parse`] only when no diagram could be built,
    /// which happens when the source has no `drakon` block.
    pub fn parse_lenient(
        &self,
        source: &str,
    ) -> Result<(semantic::Diagram, Vec<Diagnostic>), DrakonError> {
        info!("Parsing diagram leniently");

        let (diagram, diagnostics) = drakon_parser::parse(source).into_parts();
        let Some(diagram) = diagram else {
            return Err(DrakonError::new_parse_error(
                ParseError::new(diagnostics),
                source,
            ));
        };

        debug!(diagnostics = diagnostics.len(); "Diagram parsed");
        trace!(diagram:?; "Parsed diagram");

        Ok((diagram, diagnostics))
    }

    /// Sizes every node of `diagram` and computes its layout.
    ///
    /// # Errors
    ///
    /// Returns [`DrakonError::Config`] for an unusable text configuration and
    /// [`DrakonError::Layout`] if placement fails.
    pub fn layout(&self, diagram: &mut semantic::Diagram) -> Result<LayoutResult, DrakonError> {
        info!(title = diagram.title(); "Laying out diagram");

        let measure = self.config.text().measurer()?;
        layout::prepare_nodes(diagram, measure.as_ref());

        let engine = layout::Engine::new(self.config.layout().clone());
        let result = engine.calculate(diagram)?;

        info!(
            width = result.size().width(),
            height = result.size().height();
            "Layout calculated"
        );
        Ok(result)
    }

    /// Render the TOML layout report of a laid-out diagram.
    ///
    /// # Errors
    ///
    /// Returns [`DrakonError::Export`] if the report cannot be serialized.
    pub fn render_report(
        &self,
        diagram: &semantic::Diagram,
        layout: &LayoutResult,
    ) -> Result<String, DrakonError> {
        let mut report = TomlReport::new();
        report.export_layout(diagram, layout)?;
        Ok(report.into_string())
    }

    /// Render the report shown when no diagram could be built.
    ///
    /// # Errors
    ///
    /// Returns [`DrakonError::Export`] if the report cannot be serialized.
    pub fn render_placeholder(&self, has_errors: bool) -> Result<String, DrakonError> {
        let mut report = TomlReport::new();
        report.export_placeholder(export::report::placeholder_message(has_errors))?;
        Ok(report.into_string())
    }
}
