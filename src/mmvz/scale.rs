use super::domain::ResolvedDomain;
use super::params::Layout;
use crate::error::VizError;

/// Linear map from a data interval onto a pixel interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(axis: &'static str, domain: (f64, f64), range: (f64, f64)) -> Result<Self, VizError> {
        let (lo, hi) = domain;
        if lo == hi || !lo.is_finite() || !hi.is_finite() {
            return Err(VizError::DegenerateDomain { axis, lo, hi });
        }
        // A zero-width range cannot be inverted for hit testing
        if range.0 == range.1 || !range.0.is_finite() || !range.1.is_finite() {
            return Err(VizError::DegenerateDomain {
                axis,
                lo: range.0,
                hi: range.1,
            });
        }
        Ok(Self { domain, range })
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, value: f64) -> f64 {
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let t = (pixel - self.range.0) / (self.range.1 - self.range.0);
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }
}

/// Position and rate scales for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl Scales {
    pub fn build(domain: &ResolvedDomain, layout: &Layout) -> Result<Self, VizError> {
        Ok(Self {
            x: LinearScale::new("position", domain.x.as_f64(), layout.x_range())?,
            y: LinearScale::new("rate", domain.y.as_f64(), layout.y_range())?,
        })
    }

    pub fn position_to_x(&self, position: f64) -> f64 {
        self.x.apply(position)
    }

    pub fn rate_to_y(&self, rate: f64) -> f64 {
        self.y.apply(rate)
    }

    pub fn x_to_position(&self, pixel: f64) -> f64 {
        self.x.invert(pixel)
    }

    pub fn y_to_rate(&self, pixel: f64) -> f64 {
        self.y.invert(pixel)
    }
}
