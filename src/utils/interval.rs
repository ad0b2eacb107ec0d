use std::fmt;

/// Closed interval `[lo, hi]`. `lo > hi` is representable and contains nothing.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Interval<T> {
    pub lo: T,
    pub hi: T,
}

impl<T: Copy + PartialOrd> Interval<T> {
    pub fn new(lo: T, hi: T) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.lo && value <= self.hi
    }
}

impl Interval<i64> {
    pub fn as_f64(&self) -> (f64, f64) {
        (self.lo as f64, self.hi as f64)
    }
}

impl Interval<f64> {
    pub fn as_f64(&self) -> (f64, f64) {
        (self.lo, self.hi)
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}
