//! Configuration types for DRAKON diagram layout.
//!
//! All types implement [`serde::Deserialize`] and every field has a default,
//! so a configuration file only needs to name the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and text settings.
//! - [`LayoutConfig`] - Spacing and margins used to place columns and rows.
//! - [`TextConfig`] - How label widths are measured for wrapping.
//!
//! # Example
//!
//! ```
//! # use drakon::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [layout]
//!     column_gap = 100.0
//!
//!     [text]
//!     measure = "fixed"
//!     "#,
//! )
//! .expect("valid config");
//!
//! assert_eq!(config.layout().column_gap(), 100.0);
//! assert_eq!(config.layout().row_gap(), 90.0);
//! assert!(config.text().measurer().is_ok());
//! ```

use serde::Deserialize;

use drakon_core::text::{FixedWidthMeasure, FontMeasure, TextMeasure};

use crate::DrakonError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Text measurement configuration section.
    #[serde(default)]
    text: TextConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, text: TextConfig) -> Self {
        Self { layout, text }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the text configuration.
    pub fn text(&self) -> &TextConfig {
        &self.text
    }
}

/// Spacing used by the layout engine, in pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    column_gap: f32,
    column_padding: f32,
    min_column_width: f32,
    min_node_width: f32,
    top_margin: f32,
    bottom_margin: f32,
    side_margin: f32,
    row_gap: f32,
    min_width: f32,
    min_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_gap: 140.0,
            column_padding: 80.0,
            min_column_width: 260.0,
            min_node_width: 220.0,
            top_margin: 140.0,
            bottom_margin: 120.0,
            side_margin: 160.0,
            row_gap: 90.0,
            min_width: 640.0,
            min_height: 600.0,
        }
    }
}

impl LayoutConfig {
    /// Horizontal space between two columns.
    pub fn column_gap(&self) -> f32 {
        self.column_gap
    }

    /// Extra width added around the widest node of a column.
    pub fn column_padding(&self) -> f32 {
        self.column_padding
    }

    pub fn min_column_width(&self) -> f32 {
        self.min_column_width
    }

    /// Node width assumed for columns whose nodes are all narrower.
    pub fn min_node_width(&self) -> f32 {
        self.min_node_width
    }

    pub fn top_margin(&self) -> f32 {
        self.top_margin
    }

    pub fn bottom_margin(&self) -> f32 {
        self.bottom_margin
    }

    /// Margin left of the first column and right of the last one.
    pub fn side_margin(&self) -> f32 {
        self.side_margin
    }

    /// Vertical space between two depth rows.
    pub fn row_gap(&self) -> f32 {
        self.row_gap
    }

    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn with_column_gap(mut self, gap: f32) -> Self {
        self.column_gap = gap;
        self
    }
}

/// Which [`TextMeasure`] implementation measures labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureKind {
    /// Shape text against system fonts.
    #[default]
    Font,
    /// Assume every character has the same width.
    Fixed,
}

/// Label measurement settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    font_family: String,
    font_size: f32,
    measure: MeasureKind,
    fixed_char_width: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 14.0,
            measure: MeasureKind::Font,
            fixed_char_width: 8.0,
        }
    }
}

impl TextConfig {
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn measure(&self) -> MeasureKind {
        self.measure
    }

    pub fn fixed_char_width(&self) -> f32 {
        self.fixed_char_width
    }

    /// Uses the fixed-width measurer with `char_width` pixels per character.
    pub fn with_fixed_width(mut self, char_width: f32) -> Self {
        self.measure = MeasureKind::Fixed;
        self.fixed_char_width = char_width;
        self
    }

    /// Creates the configured measurer.
    ///
    /// # Errors
    ///
    /// Returns [`DrakonError::Config`] when the configured size is not a
    /// positive number.
    pub fn measurer(&self) -> Result<Box<dyn TextMeasure>, DrakonError> {
        match self.measure {
            MeasureKind::Font => {
                if !(self.font_size.is_finite() && self.font_size > 0.0) {
                    return Err(DrakonError::Config(format!(
                        "text.font_size must be positive, got {}",
                        self.font_size
                    )));
                }
                Ok(Box::new(FontMeasure::new(
                    self.font_family.clone(),
                    self.font_size,
                )))
            }
            MeasureKind::Fixed => {
                if !(self.fixed_char_width.is_finite() && self.fixed_char_width > 0.0) {
                    return Err(DrakonError::Config(format!(
                        "text.fixed_char_width must be positive, got {}",
                        self.fixed_char_width
                    )));
                }
                Ok(Box::new(FixedWidthMeasure::new(self.fixed_char_width)))
            }
        }
    }
}
