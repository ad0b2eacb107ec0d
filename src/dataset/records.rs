use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn name(&self) -> &'static str {
        match self {
            Strand::Forward => "forward",
            Strand::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.name())
    }
}

/// Mismatch tally at one genome position
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchRecord {
    pub position: i64,
    pub mismatch_count: u32,
    pub consensus_base: char,
    pub sample_count: u32,
}

impl MismatchRecord {
    pub fn new(position: i64, mismatch_count: u32, consensus_base: char, sample_count: u32) -> Self {
        Self {
            position,
            mismatch_count,
            consensus_base,
            sample_count,
        }
    }

    /// Fraction of sequences that disagree with the consensus; NaN when `sample_count` is 0
    pub fn rate(&self) -> f64 {
        if self.sample_count == 0 {
            return f64::NAN;
        }
        self.mismatch_count as f64 / self.sample_count as f64
    }

    pub fn percent(&self) -> f64 {
        self.rate() * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimerRecord {
    pub name: String,
    pub sequence: String,
    pub start_position: i64,
    pub stop_position: i64,
    pub primer_length: i64,
    pub capture_length: i64,
}

impl PrimerRecord {
    pub fn new(
        name: impl Into<String>,
        start_position: i64,
        stop_position: i64,
        primer_length: i64,
        capture_length: i64,
    ) -> Self {
        Self {
            name: name.into(),
            sequence: String::new(),
            start_position,
            stop_position,
            primer_length,
            capture_length,
        }
    }

    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = sequence.into();
        self
    }
}
