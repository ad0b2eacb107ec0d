use super::records::{MismatchRecord, PrimerRecord, Strand};
use std::collections::HashMap;

/// The three record collections, loaded once and never modified afterwards
#[derive(Debug, Default)]
pub struct DatasetStore {
    mismatches: Vec<MismatchRecord>,
    forwards: Vec<PrimerRecord>,
    reverses: Vec<PrimerRecord>,
    by_position: HashMap<i64, usize>,
    forward_names: HashMap<String, usize>,
    reverse_names: HashMap<String, usize>,
    max_position: Option<i64>,
}

impl DatasetStore {
    pub fn new(
        mismatches: Vec<MismatchRecord>,
        forwards: Vec<PrimerRecord>,
        reverses: Vec<PrimerRecord>,
    ) -> Self {
        let max_position = mismatches.iter().map(|record| record.position).max();

        let mut by_position = HashMap::with_capacity(mismatches.len());
        for (index, record) in mismatches.iter().enumerate() {
            if by_position.contains_key(&record.position) {
                log::warn!(
                    "Position {} appears more than once; hover will report the first record",
                    record.position
                );
                continue;
            }
            by_position.insert(record.position, index);
        }

        let forward_names = index_names(&forwards, Strand::Forward);
        let reverse_names = index_names(&reverses, Strand::Reverse);

        log::info!(
            "Loaded {} mismatch positions, {} forward and {} reverse primers",
            mismatches.len(),
            forwards.len(),
            reverses.len()
        );

        Self {
            mismatches,
            forwards,
            reverses,
            by_position,
            forward_names,
            reverse_names,
            max_position,
        }
    }

    pub fn mismatches(&self) -> &[MismatchRecord] {
        &self.mismatches
    }

    pub fn primers(&self, strand: Strand) -> &[PrimerRecord] {
        match strand {
            Strand::Forward => &self.forwards,
            Strand::Reverse => &self.reverses,
        }
    }

    /// First record with this name on the given strand
    pub fn primer(&self, strand: Strand, name: &str) -> Option<&PrimerRecord> {
        let names = match strand {
            Strand::Forward => &self.forward_names,
            Strand::Reverse => &self.reverse_names,
        };
        names.get(name).map(|&index| &self.primers(strand)[index])
    }

    pub fn mismatch_at(&self, position: i64) -> Option<&MismatchRecord> {
        self.by_position
            .get(&position)
            .map(|&index| &self.mismatches[index])
    }

    pub fn max_position(&self) -> Option<i64> {
        self.max_position
    }

    /// Sequence count reported in the legend, taken from the first record
    pub fn sequence_count(&self) -> Option<u32> {
        self.mismatches.first().map(|record| record.sample_count)
    }
}

fn index_names(primers: &[PrimerRecord], strand: Strand) -> HashMap<String, usize> {
    let mut names = HashMap::with_capacity(primers.len());
    for (index, primer) in primers.iter().enumerate() {
        if names.contains_key(&primer.name) {
            log::warn!(
                "Duplicate {} primer name '{}'; keeping the first record",
                strand,
                primer.name
            );
            continue;
        }
        names.insert(primer.name.clone(), index);
    }
    names
}
