//! Per-type shape metrics.
//!
//! Sizes are derived from a common base node so the icons keep their
//! proportions to each other. Types without an entry use [`ShapeSpec::DEFAULT`].

use drakon_core::{geometry::Insets, semantic::NodeKind};

const BASE_NODE_WIDTH: f32 = 240.0;
const BASE_NODE_MIN_HEIGHT: f32 = 170.0;
const BASE_LINE_HEIGHT: f32 = 22.0;
const BASE_TEXT_PADDING: f32 = 28.0;

/// Size and text metrics of one node type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSpec {
    width: f32,
    min_height: f32,
    line_height: f32,
    padding: Insets,
    dynamic_height: bool,
}

impl ShapeSpec {
    pub const DEFAULT: Self = Self::new(BASE_NODE_WIDTH, BASE_NODE_MIN_HEIGHT, BASE_LINE_HEIGHT);

    const fn new(width: f32, min_height: f32, line_height: f32) -> Self {
        Self {
            width,
            min_height,
            line_height,
            padding: Insets::uniform(BASE_TEXT_PADDING),
            dynamic_height: true,
        }
    }

    const fn with_vertical_padding(mut self, top: f32, bottom: f32) -> Self {
        self.padding = Insets::new(top, self.padding.right(), bottom, self.padding.left());
        self
    }

    const fn with_horizontal_padding(mut self, left: f32, right: f32) -> Self {
        self.padding = Insets::new(self.padding.top(), right, self.padding.bottom(), left);
        self
    }

    /// Keeps the minimum height regardless of the label length.
    pub const fn with_fixed_height(mut self) -> Self {
        self.dynamic_height = false;
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    pub fn dynamic_height(&self) -> bool {
        self.dynamic_height
    }

    /// Width left for text once the horizontal padding is removed.
    pub fn text_width(&self) -> f32 {
        (self.width - self.padding.horizontal_sum()).max(4.0)
    }

    /// Height of a node showing `line_count` lines of text.
    pub fn height_for(&self, line_count: usize) -> f32 {
        if !self.dynamic_height {
            return self.min_height;
        }
        let text_height = self.padding.vertical_sum() + line_count as f32 * self.line_height;
        self.min_height.max(text_height)
    }
}

impl Default for ShapeSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const fn scaled(base: f32, numerator: f32, denominator: f32) -> f32 {
    base * numerator / denominator
}

const START: ShapeSpec = ShapeSpec::new(
    scaled(BASE_NODE_WIDTH, 5.0, 6.0),
    scaled(BASE_NODE_MIN_HEIGHT, 10.0, 17.0),
    scaled(BASE_LINE_HEIGHT, 10.0, 11.0),
)
.with_vertical_padding(
    scaled(BASE_TEXT_PADDING, 5.0, 7.0),
    scaled(BASE_TEXT_PADDING, 5.0, 7.0),
);

const END: ShapeSpec = ShapeSpec::new(BASE_NODE_WIDTH, 140.0, BASE_LINE_HEIGHT);

const ACTION: ShapeSpec = ShapeSpec::new(
    BASE_NODE_WIDTH,
    scaled(BASE_NODE_MIN_HEIGHT, 14.0, 17.0),
    BASE_LINE_HEIGHT,
);

const PARAMETERS: ShapeSpec = ShapeSpec::new(
    scaled(BASE_NODE_WIDTH, 5.0, 4.0),
    scaled(BASE_NODE_MIN_HEIGHT, 11.0, 17.0),
    scaled(BASE_LINE_HEIGHT, 9.0, 11.0),
)
.with_vertical_padding(
    scaled(BASE_TEXT_PADDING, 6.0, 7.0),
    scaled(BASE_TEXT_PADDING, 5.0, 7.0),
)
.with_horizontal_padding(
    scaled(BASE_TEXT_PADDING, 8.0, 7.0),
    scaled(BASE_TEXT_PADDING, 6.0, 7.0),
);

const COMMENT: ShapeSpec = ShapeSpec::new(
    scaled(BASE_NODE_WIDTH, 7.0, 6.0),
    scaled(BASE_NODE_MIN_HEIGHT, 18.0, 17.0),
    BASE_LINE_HEIGHT,
)
.with_vertical_padding(
    scaled(BASE_TEXT_PADDING, 9.0, 7.0),
    scaled(BASE_TEXT_PADDING, 9.0, 7.0),
)
.with_horizontal_padding(
    scaled(BASE_TEXT_PADDING, 10.0, 7.0),
    scaled(BASE_TEXT_PADDING, 10.0, 7.0),
);

const QUESTION: ShapeSpec = ShapeSpec::new(
    scaled(BASE_NODE_WIDTH, 4.0, 3.0),
    BASE_NODE_MIN_HEIGHT,
    BASE_LINE_HEIGHT,
);

const CHOICE: ShapeSpec = ShapeSpec::new(280.0, 200.0, 24.0).with_vertical_padding(36.0, 36.0);

const CHOICE_CASE: ShapeSpec = ShapeSpec::new(BASE_NODE_WIDTH, BASE_NODE_MIN_HEIGHT, BASE_LINE_HEIGHT)
    .with_vertical_padding(
        scaled(BASE_TEXT_PADDING, 10.0, 9.0),
        scaled(BASE_TEXT_PADDING, 6.0, 5.0),
    );

const INSERTION: ShapeSpec = ShapeSpec::new(
    scaled(BASE_NODE_WIDTH, 13.0, 12.0),
    scaled(BASE_NODE_MIN_HEIGHT, 20.0, 17.0),
    BASE_LINE_HEIGHT,
)
.with_vertical_padding(
    scaled(BASE_TEXT_PADDING, 8.0, 7.0),
    scaled(BASE_TEXT_PADDING, 8.0, 7.0),
);

// Loop heads and tails share one compact shape.
const LOOP_BOUND: ShapeSpec = ShapeSpec::new(
    scaled(BASE_NODE_WIDTH, 13.0, 12.0),
    scaled(BASE_NODE_MIN_HEIGHT, 9.0, 17.0),
    scaled(BASE_LINE_HEIGHT, 9.0, 11.0),
)
.with_vertical_padding(
    scaled(BASE_TEXT_PADDING, 3.0, 7.0),
    scaled(BASE_TEXT_PADDING, 3.0, 7.0),
);

const PARALLEL: ShapeSpec = ShapeSpec::new(
    scaled(BASE_NODE_WIDTH, 13.0, 12.0),
    scaled(BASE_NODE_MIN_HEIGHT, 22.0, 17.0),
    scaled(BASE_LINE_HEIGHT, 12.0, 11.0),
)
.with_vertical_padding(
    scaled(BASE_TEXT_PADDING, 9.0, 7.0),
    scaled(BASE_TEXT_PADDING, 9.0, 7.0),
);

const IO: ShapeSpec = ShapeSpec::new(
    scaled(BASE_NODE_WIDTH, 7.0, 6.0),
    scaled(BASE_NODE_MIN_HEIGHT, 18.0, 17.0),
    BASE_LINE_HEIGHT,
)
.with_vertical_padding(
    scaled(BASE_TEXT_PADDING, 8.0, 7.0),
    scaled(BASE_TEXT_PADDING, 8.0, 7.0),
);

const SIMPLE_IO: ShapeSpec = ShapeSpec::new(
    BASE_NODE_WIDTH,
    scaled(BASE_NODE_MIN_HEIGHT, 14.0, 17.0),
    BASE_LINE_HEIGHT,
)
.with_vertical_padding(BASE_TEXT_PADDING, scaled(BASE_TEXT_PADDING, 6.0, 7.0));

const SHELF: ShapeSpec = ShapeSpec::new(320.0, 190.0, BASE_LINE_HEIGHT).with_vertical_padding(42.0, 28.0);

const PROCESS: ShapeSpec = ShapeSpec::new(260.0, 260.0, 24.0).with_vertical_padding(72.0, 36.0);

const CTRL_PERIOD: ShapeSpec = ShapeSpec::new(
    scaled(BASE_NODE_WIDTH, 13.0, 12.0),
    scaled(BASE_NODE_MIN_HEIGHT, 22.0, 17.0),
    scaled(BASE_LINE_HEIGHT, 12.0, 11.0),
)
.with_vertical_padding(
    scaled(BASE_TEXT_PADDING, 11.0, 7.0),
    scaled(BASE_TEXT_PADDING, 9.0, 7.0),
);

const DURATION: ShapeSpec = ShapeSpec::new(
    BASE_NODE_WIDTH,
    scaled(BASE_NODE_MIN_HEIGHT, 14.0, 17.0),
    BASE_LINE_HEIGHT,
)
.with_vertical_padding(
    scaled(BASE_TEXT_PADDING, 13.0, 14.0),
    scaled(BASE_TEXT_PADDING, 13.0, 14.0),
);

const PAUSE: ShapeSpec = ShapeSpec::new(
    BASE_NODE_WIDTH,
    scaled(BASE_NODE_MIN_HEIGHT, 16.0, 17.0),
    BASE_LINE_HEIGHT,
)
.with_vertical_padding(
    scaled(BASE_TEXT_PADDING, 8.0, 7.0),
    scaled(BASE_TEXT_PADDING, 8.0, 7.0),
);

const TIMER: ShapeSpec = ShapeSpec::new(
    scaled(BASE_NODE_WIDTH, 13.0, 12.0),
    scaled(BASE_NODE_MIN_HEIGHT, 26.0, 17.0),
    scaled(BASE_LINE_HEIGHT, 12.0, 11.0),
)
.with_vertical_padding(
    BASE_TEXT_PADDING * 5.0,
    scaled(BASE_TEXT_PADDING, 9.0, 7.0),
);

const GROUP_DURATION: ShapeSpec = ShapeSpec::new(120.0, 260.0, BASE_LINE_HEIGHT).with_vertical_padding(36.0, 36.0);

/// Returns the shape of nodes of `kind`.
pub fn shape_spec(kind: &NodeKind) -> ShapeSpec {
    match kind.as_str() {
        "start" => START,
        "end" => END,
        "action" => ACTION,
        "parameters" => PARAMETERS,
        "comment" => COMMENT,
        "question" => QUESTION,
        "choice" => CHOICE,
        "choice_case" | "choice_else" => CHOICE_CASE,
        "insertion" => INSERTION,
        "for_each" | "loop_end" => LOOP_BOUND,
        "parallel" => PARALLEL,
        "input" | "output" => IO,
        "simple_input" | "simple_output" => SIMPLE_IO,
        "shelf" => SHELF,
        "process" => PROCESS,
        "ctrl_period_start" | "ctrl_period_end" => CTRL_PERIOD,
        "duration" => DURATION,
        "pause" => PAUSE,
        "timer" => TIMER,
        "group_duration" => GROUP_DURATION,
        _ => ShapeSpec::DEFAULT,
    }
}
