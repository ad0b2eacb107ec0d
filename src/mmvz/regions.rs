use crate::dataset::{PrimerRecord, Strand};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Priming,
    Capture,
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::Priming => write!(formatter, "priming"),
            Role::Capture => write!(formatter, "capture"),
        }
    }
}

/// Sub-interval of a primer drawn on the primer track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimerRegion {
    pub strand: Strand,
    pub role: Role,
    pub start: i64,
    pub stop: i64,
}

impl PrimerRegion {
    pub fn key(&self) -> (Strand, Role) {
        (self.strand, self.role)
    }
}

/// Priming and capture regions of the selected primer pair.
///
/// The forward primer primes from its start and captures at its stop. The reverse
/// primer is read the other way round: it primes over the trailing
/// `capture_length` bases and captures over the leading `primer_length` bases.
pub fn primer_regions(forward: &PrimerRecord, reverse: &PrimerRecord) -> [PrimerRegion; 4] {
    [
        PrimerRegion {
            strand: Strand::Forward,
            role: Role::Priming,
            start: forward.start_position,
            stop: forward.start_position + forward.primer_length,
        },
        PrimerRegion {
            strand: Strand::Forward,
            role: Role::Capture,
            start: forward.stop_position - forward.capture_length,
            stop: forward.stop_position,
        },
        PrimerRegion {
            strand: Strand::Reverse,
            role: Role::Priming,
            start: reverse.stop_position - reverse.capture_length,
            stop: reverse.stop_position,
        },
        PrimerRegion {
            strand: Strand::Reverse,
            role: Role::Capture,
            start: reverse.start_position,
            stop: reverse.start_position + reverse.primer_length,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_of_scenario_pair() {
        let forward = PrimerRecord::new("F1", 100, 130, 20, 15);
        let reverse = PrimerRecord::new("R1", 400, 430, 20, 15);
        let regions = primer_regions(&forward, &reverse);

        let spans: Vec<(Strand, Role, i64, i64)> = regions
            .iter()
            .map(|region| (region.strand, region.role, region.start, region.stop))
            .collect();
        assert_eq!(
            spans,
            vec![
                (Strand::Forward, Role::Priming, 100, 120),
                (Strand::Forward, Role::Capture, 115, 130),
                (Strand::Reverse, Role::Priming, 415, 430),
                (Strand::Reverse, Role::Capture, 400, 420),
            ]
        );
        assert!(regions.iter().all(|region| region.stop >= region.start));
    }

    #[test]
    fn keys_are_unique() {
        let forward = PrimerRecord::new("F1", 100, 130, 20, 15);
        let regions = primer_regions(&forward, &forward);
        let mut keys: Vec<_> = regions.iter().map(PrimerRegion::key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }
}
