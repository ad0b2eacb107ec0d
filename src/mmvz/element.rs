use super::axis::{Axis, Tick};
use super::params::{
    base_color, Color, Layout, GLYPH_FONT_SIZE, MIN_BAR_WIDTH, REGION_HEIGHT, TICK_FONT_SIZE,
};
use super::regions::{PrimerRegion, Role};
use super::scale::Scales;
use super::view_state::ViewMode;
use crate::dataset::{MismatchRecord, Strand};
use crate::error::VizError;
use pipeplot::{Anchor, ElementId, Rect, Shape, Text};
use std::fmt::Debug;

/// Geometry inputs shared by every element of one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub layout: Layout,
    pub scales: Scales,
    pub mode: ViewMode,
    pub bar_width: f64,
    pub hovered: Option<i64>,
}

/// Bars share the viewport evenly with a one pixel gap; crowded windows fall back
/// to a hairline instead of vanishing.
pub fn bar_width(viewport_width: f64, count: usize) -> f64 {
    if count == 0 {
        return viewport_width.max(MIN_BAR_WIDTH);
    }
    let width = viewport_width / count as f64 - 1.0;
    if width > 0.0 && width.is_finite() {
        width
    } else {
        MIN_BAR_WIDTH
    }
}

/// A family of keyed scene elements reconciled together.
///
/// Implementations turn a datum into the element's settled geometry and may provide
/// the geometry an element starts from when it enters and heads to when it exits.
/// Without overrides, elements appear at their target and leave in place.
pub trait Category {
    type Datum;
    type Key: Ord + Clone + Debug;

    /// Group the elements are created in
    const LAYER: &'static str;
    const NAME: &'static str;

    fn key(datum: &Self::Datum) -> Self::Key;

    fn element_id(key: &Self::Key) -> ElementId;

    fn geometry(datum: &Self::Datum, frame: &Frame) -> Result<Shape, VizError>;

    fn enter_from(_target: &Shape, _frame: &Frame) -> Option<Shape> {
        None
    }

    fn exit_to(current: &Shape, _frame: &Frame) -> Shape {
        current.clone()
    }
}

/// Moves a shape horizontally, keeping every other attribute
pub fn with_x(shape: &Shape, x: f64) -> Shape {
    match shape {
        Shape::Group => Shape::Group,
        Shape::Rect(rect) => Shape::Rect(Rect { x, ..rect.clone() }),
        Shape::Text(text) => Shape::Text(Text { x, ..text.clone() }),
    }
}

pub fn with_fill(shape: &Shape, fill: String) -> Shape {
    match shape {
        Shape::Group => Shape::Group,
        Shape::Rect(rect) => Shape::Rect(Rect { fill, ..rect.clone() }),
        Shape::Text(text) => Shape::Text(Text { fill, ..text.clone() }),
    }
}

fn checked_rate(record: &MismatchRecord) -> Result<f64, VizError> {
    let rate = record.rate();
    if rate.is_finite() {
        Ok(rate)
    } else {
        Err(VizError::InvalidRecord {
            origin: format!("mismatch at position {}", record.position),
            field: "number_of_sequences",
            value: record.sample_count.to_string(),
        })
    }
}

pub struct Bars;

impl Bars {
    pub fn fill(position: i64, hovered: Option<i64>) -> Color {
        if hovered == Some(position) {
            Color::Hovered
        } else {
            Color::Bar
        }
    }
}

impl Category for Bars {
    type Datum = MismatchRecord;
    type Key = i64;

    const LAYER: &'static str = "bars";
    const NAME: &'static str = "bars";

    fn key(record: &MismatchRecord) -> i64 {
        record.position
    }

    fn element_id(position: &i64) -> ElementId {
        format!("bar-{}", position)
    }

    fn geometry(record: &MismatchRecord, frame: &Frame) -> Result<Shape, VizError> {
        let rate = checked_rate(record)?;
        let y = frame.scales.rate_to_y(rate);
        let height = frame.layout.height - y - frame.layout.baseline_offset();
        Ok(Shape::Rect(Rect {
            x: frame.scales.position_to_x(record.position as f64 - 0.5),
            y,
            width: frame.bar_width,
            // Rates below the visible floor collapse to an empty bar
            height: height.max(0.0),
            fill: Bars::fill(record.position, frame.hovered).to_string(),
        }))
    }

    fn enter_from(target: &Shape, frame: &Frame) -> Option<Shape> {
        Some(with_x(target, frame.layout.width))
    }

    fn exit_to(current: &Shape, frame: &Frame) -> Shape {
        with_x(current, frame.layout.width)
    }
}

pub struct Regions;

impl Category for Regions {
    type Datum = PrimerRegion;
    type Key = (Strand, Role);

    const LAYER: &'static str = "regions";
    const NAME: &'static str = "regions";

    fn key(region: &PrimerRegion) -> (Strand, Role) {
        region.key()
    }

    fn element_id(key: &(Strand, Role)) -> ElementId {
        format!("region-{}-{}", key.0, key.1)
    }

    fn geometry(region: &PrimerRegion, frame: &Frame) -> Result<Shape, VizError> {
        let x = &frame.scales;
        let fill = match region.strand {
            Strand::Forward => Color::Forward,
            Strand::Reverse => Color::Reverse,
        };
        Ok(Shape::Rect(Rect {
            x: x.position_to_x(region.start as f64 + 0.5),
            y: frame.layout.region_y(),
            width: (x.position_to_x(region.stop as f64) - x.position_to_x(region.start as f64)).max(0.0),
            height: REGION_HEIGHT,
            fill: fill.to_string(),
        }))
    }
}

pub struct Glyphs;

impl Category for Glyphs {
    type Datum = MismatchRecord;
    type Key = i64;

    const LAYER: &'static str = "sequence";
    const NAME: &'static str = "glyphs";

    fn key(record: &MismatchRecord) -> i64 {
        record.position
    }

    fn element_id(position: &i64) -> ElementId {
        format!("glyph-{}", position)
    }

    fn geometry(record: &MismatchRecord, frame: &Frame) -> Result<Shape, VizError> {
        Ok(Shape::Text(Text {
            x: frame.scales.position_to_x(record.position as f64 - 0.3),
            y: frame.layout.glyph_y(),
            content: record.consensus_base.to_string(),
            fill: base_color(record.consensus_base).to_string(),
            size: GLYPH_FONT_SIZE,
            anchor: Anchor::Start,
        }))
    }

    fn enter_from(target: &Shape, frame: &Frame) -> Option<Shape> {
        Some(with_x(target, frame.layout.width))
    }

    fn exit_to(current: &Shape, frame: &Frame) -> Shape {
        with_x(current, frame.layout.width)
    }
}

pub struct Ticks;

impl Category for Ticks {
    type Datum = Tick;
    type Key = (Axis, String);

    const LAYER: &'static str = "axes";
    const NAME: &'static str = "ticks";

    fn key(tick: &Tick) -> (Axis, String) {
        (tick.axis, tick.label.clone())
    }

    fn element_id(key: &(Axis, String)) -> ElementId {
        format!("{}-tick-{}", key.0, key.1)
    }

    fn geometry(tick: &Tick, frame: &Frame) -> Result<Shape, VizError> {
        let layout = &frame.layout;
        let (x, y, anchor) = match tick.axis {
            Axis::X => (
                frame.scales.position_to_x(tick.value),
                layout.x_axis_y() + 18.0,
                Anchor::Middle,
            ),
            Axis::Y => (
                layout.margins.left - 9.0,
                frame.scales.rate_to_y(tick.value) - layout.margins.top + 3.0,
                Anchor::End,
            ),
        };
        Ok(Shape::Text(Text {
            x,
            y,
            content: tick.label.clone(),
            fill: Color::Axis.to_string(),
            size: TICK_FONT_SIZE,
            anchor,
        }))
    }
}
