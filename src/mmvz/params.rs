use std::fmt;

pub const DEFAULT_WIDTH: f64 = 1200.0;
pub const DEFAULT_HEIGHT: f64 = 800.0;
pub const DEFAULT_DURATION: f64 = 1500.0;

/// Space below the histogram reserved for the axis, primer track and sequence track
pub const PLOT_FOOTER: f64 = 100.0;
pub const REGION_HEIGHT: f64 = 10.0;
pub const MIN_BAR_WIDTH: f64 = 0.1;
pub const GLYPH_FONT_SIZE: f64 = 12.0;
pub const TICK_FONT_SIZE: f64 = 10.0;
pub const CAPTION_FONT_SIZE: f64 = 14.0;
pub const TOOLTIP_FONT_SIZE: f64 = 12.0;
pub const TOOLTIP_OFFSET: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 10.0,
            bottom: 20.0,
            left: 70.0,
            right: 10.0,
        }
    }
}

/// Viewport geometry and animation timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub duration: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            margins: Margins::default(),
            duration: DEFAULT_DURATION,
        }
    }
}

impl Layout {
    pub fn x_range(&self) -> (f64, f64) {
        (self.margins.left, self.width - self.margins.right)
    }

    /// Rates grow upwards, so the range runs from the baseline to the top margin
    pub fn y_range(&self) -> (f64, f64) {
        (self.height - self.margins.top - PLOT_FOOTER, self.margins.bottom)
    }

    pub fn baseline_offset(&self) -> f64 {
        PLOT_FOOTER + self.margins.bottom
    }

    pub fn x_axis_y(&self) -> f64 {
        self.height - self.margins.bottom - PLOT_FOOTER
    }

    pub fn region_y(&self) -> f64 {
        self.height - self.margins.bottom - 75.0
    }

    pub fn glyph_y(&self) -> f64 {
        self.height - 60.0
    }

    pub fn legend_x(&self) -> f64 {
        self.width - 300.0
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Color {
    Bar,
    Hovered,
    Forward,
    Reverse,
    Axis,
    Caption,
    Tooltip,
    BaseA,
    BaseT,
    BaseG,
    BaseC,
    BaseN,
}

impl fmt::Display for Color {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::Bar => write!(formatter, "#4682B4"),
            Color::Hovered => write!(formatter, "#E16A2C"),
            Color::Forward => write!(formatter, "#FF0000"),
            Color::Reverse => write!(formatter, "#0000FF"),
            Color::Axis => write!(formatter, "#000000"),
            Color::Caption => write!(formatter, "#333333"),
            Color::Tooltip => write!(formatter, "#222222"),
            Color::BaseA => write!(formatter, "#22AA22"),
            Color::BaseT => write!(formatter, "#DD0000"),
            Color::BaseG => write!(formatter, "#CC9900"),
            Color::BaseC => write!(formatter, "#2222DD"),
            Color::BaseN => write!(formatter, "#000000"),
        }
    }
}

/// Returns the display color for a nucleotide base
pub fn base_color(base: char) -> Color {
    match base {
        'A' | 'a' => Color::BaseA,
        'T' | 't' | 'U' | 'u' => Color::BaseT,
        'G' | 'g' => Color::BaseG,
        'C' | 'c' => Color::BaseC,
        _ => Color::BaseN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_geometry() {
        let layout = Layout::default();
        assert_eq!(layout.x_range(), (70.0, 1190.0));
        assert_eq!(layout.y_range(), (690.0, 20.0));
        assert_eq!(layout.baseline_offset(), 120.0);
        assert_eq!(layout.region_y(), 705.0);
        assert_eq!(layout.glyph_y(), 740.0);
        assert_eq!(layout.legend_x(), 900.0);
    }

    #[test]
    fn bases_have_distinct_colors() {
        assert_eq!(base_color('a'), Color::BaseA);
        assert_eq!(base_color('U'), Color::BaseT);
        assert_eq!(base_color('-'), Color::BaseN);
        assert_eq!(Color::Forward.to_string(), "#FF0000");
    }
}
