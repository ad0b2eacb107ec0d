use super::scale::Scales;
use crate::utils::{format_percent, format_thousands};
use std::fmt;

pub const TICK_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::X => write!(formatter, "x"),
            Axis::Y => write!(formatter, "y"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub axis: Axis,
    pub value: f64,
    pub label: String,
}

/// Labelled ticks for both axes of a frame
pub fn axis_ticks(scales: &Scales) -> Vec<Tick> {
    let (x_lo, x_hi) = scales.x.domain();
    let (y_lo, y_hi) = scales.y.domain();

    let x_ticks = ticks(x_lo, x_hi, TICK_COUNT).into_iter().map(|value| Tick {
        axis: Axis::X,
        value,
        label: format_thousands(value.round() as i64),
    });
    let y_ticks = ticks(y_lo, y_hi, TICK_COUNT).into_iter().map(|value| Tick {
        axis: Axis::Y,
        value,
        label: format_percent(value, 1),
    });
    x_ticks.chain(y_ticks).collect()
}

/// Round tick increment (1, 2 or 5 times a power of ten) giving roughly `count`
/// ticks. Sub-unit increments are returned as the negated inverse, so that a step
/// of 0.002 comes back as -500 and tick values can be computed without drift.
fn tick_increment(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo).abs() / count.max(1) as f64;
    let power = raw.log10().floor() as i32;
    let error = raw / 10f64.powi(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0 {
        factor * 10f64.powi(power)
    } else {
        -10f64.powi(-power) / factor
    }
}

pub fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let increment = tick_increment(lo, hi, count);
    if increment < 0.0 {
        -1.0 / increment
    } else {
        increment
    }
}

/// Evenly spaced round values inside `[lo, hi]`, ascending
pub fn ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if lo == hi || !lo.is_finite() || !hi.is_finite() || count == 0 {
        return Vec::new();
    }
    let increment = tick_increment(lo, hi, count);
    if !increment.is_finite() || increment == 0.0 {
        return Vec::new();
    }

    let (first, last) = if increment > 0.0 {
        ((lo / increment).ceil(), (hi / increment).floor())
    } else {
        ((lo * -increment).ceil(), (hi * -increment).floor())
    };
    let mut values = Vec::new();
    let mut k = first;
    while k <= last {
        values.push(if increment > 0.0 { k * increment } else { k / -increment });
        k += 1.0;
    }
    values
}
