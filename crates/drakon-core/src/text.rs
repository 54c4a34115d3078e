//! Text width measurement for label wrapping.
//!
//! The layout engine only needs one question answered: how wide is this
//! string when drawn? [`TextMeasure`] abstracts the answer so layout can run
//! against real font metrics ([`FontMeasure`]) or a deterministic
//! per-character estimate ([`FixedWidthMeasure`]).
//!
//! # Quick Start
//!
//! ```
//! # use drakon_core::text::{FixedWidthMeasure, TextMeasure};
//! let measure = FixedWidthMeasure::default();
//! assert_eq!(measure.measure_width("abcd"), 32.0);
//! ```

use std::{
    fmt,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{debug, info};

/// Measures the rendered width of a single line of text, in pixels.
pub trait TextMeasure: fmt::Debug {
    fn measure_width(&self, text: &str) -> f32;
}

/// Estimates width as `chars * char_width`.
///
/// This is also what the font-backed measurer falls back to when shaping
/// produces no layout runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidthMeasure {
    char_width: f32,
}

impl FixedWidthMeasure {
    pub fn new(char_width: f32) -> Self {
        Self { char_width }
    }

    pub fn char_width(&self) -> f32 {
        self.char_width
    }
}

impl Default for FixedWidthMeasure {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl TextMeasure for FixedWidthMeasure {
    fn measure_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

/// Measures text with cosmic-text shaping against the system fonts.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMeasure {
    family: String,
    size: f32,
}

impl FontMeasure {
    /// Creates a measurer for `family` at `size` pixels.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}

impl Default for FontMeasure {
    fn default() -> Self {
        Self::new("sans-serif", 14.0)
    }
}

impl TextMeasure for FontMeasure {
    fn measure_width(&self, text: &str) -> f32 {
        TEXT_MANAGER
            .get_or_init(TextManager::default)
            .measure_width(text, &self.family, self.size)
    }
}

/// Holds the process-wide [`FontSystem`].
///
/// Loading system fonts is expensive, so one instance is created lazily and
/// shared. It holds no diagram state.
struct TextManager {
    font_system: Arc<Mutex<FontSystem>>,
}

impl Default for TextManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Arc::new(Mutex::new(FontSystem::new())),
        }
    }

    fn measure_width(&self, text: &str, family: &str, size: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        // A poisoned lock still guards a usable FontSystem.
        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let metrics = Metrics::new(size, size * 1.15);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let family = match family {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            name => Family::Name(name),
        };
        let attrs = Attrs::new().family(family);

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let width = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|glyph| glyph.x + glyph.w))
            .reduce(f32::max);

        width.unwrap_or_else(|| {
            debug!(text; "No layout runs, estimating width");
            FixedWidthMeasure::default().measure_width(text)
        })
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
