use super::view_state::{ViewMode, ViewState};
use crate::dataset::{DatasetStore, MismatchRecord, PrimerRecord, Strand};
use crate::error::VizError;
use crate::utils::Interval;
use itertools::Itertools;

/// Bases shown beyond the primer span on each side
pub const DOMAIN_PADDING: i64 = 10;
/// Below this peak rate the y axis falls back to a fixed ceiling
pub const LOW_RATE_THRESHOLD: f64 = 0.01;
pub const OVERVIEW_RATE_CEILING: f64 = 0.03;
pub const STRAND_RATE_CEILING: f64 = 0.01;
pub const RATE_HEADROOM: f64 = 1.2;

/// Everything the scene needs to know about the current window
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDomain<'a> {
    pub forward: &'a PrimerRecord,
    pub reverse: &'a PrimerRecord,
    pub x: Interval<i64>,
    pub y: Interval<f64>,
    pub active: Vec<&'a MismatchRecord>,
    pub amplicon_length: i64,
}

pub fn resolve_primer<'a>(
    state: &ViewState,
    store: &'a DatasetStore,
    strand: Strand,
) -> Result<&'a PrimerRecord, VizError> {
    let name = state.selected(strand);
    name.and_then(|name| store.primer(strand, name))
        .ok_or_else(|| VizError::SelectionMissing {
            strand,
            name: name.filter(|name| !name.is_empty()).map(str::to_string),
        })
}

pub fn resolve_domain<'a>(state: &ViewState, store: &'a DatasetStore) -> Result<ResolvedDomain<'a>, VizError> {
    let forward = resolve_primer(state, store, Strand::Forward)?;
    let reverse = resolve_primer(state, store, Strand::Reverse)?;

    let x = x_domain(state.mode, forward, reverse, store.max_position());
    let active = store
        .mismatches()
        .iter()
        .filter(|record| x.contains(record.position))
        .collect_vec();
    let y = y_domain(state.mode, &active)?;

    log::trace!(
        "Resolved {} view: x={} y={} with {} active positions",
        state.mode,
        x,
        y,
        active.len()
    );

    Ok(ResolvedDomain {
        forward,
        reverse,
        x,
        y,
        active,
        amplicon_length: reverse.stop_position - forward.start_position,
    })
}

/// Genome window for a view mode. A negative lower bound is kept as is.
pub fn x_domain(
    mode: ViewMode,
    forward: &PrimerRecord,
    reverse: &PrimerRecord,
    max_position: Option<i64>,
) -> Interval<i64> {
    let start = forward.start_position;
    let stop = reverse.stop_position;
    match mode {
        ViewMode::Default => Interval::new(start - DOMAIN_PADDING, stop + DOMAIN_PADDING),
        ViewMode::ForwardOnly => Interval::new(
            start - DOMAIN_PADDING,
            forward.stop_position + DOMAIN_PADDING,
        ),
        ViewMode::ReverseOnly => Interval::new(
            reverse.start_position - DOMAIN_PADDING,
            stop + DOMAIN_PADDING,
        ),
        ViewMode::FullGenome => Interval::new(0, max_position.unwrap_or(0)),
    }
}

/// Rate axis: 20% headroom over the peak, or a fixed ceiling when the peak is tiny
pub fn y_domain(mode: ViewMode, active: &[&MismatchRecord]) -> Result<Interval<f64>, VizError> {
    let mut max_rate: f64 = 0.0;
    for record in active {
        let rate = record.rate();
        if !rate.is_finite() {
            return Err(VizError::InvalidRecord {
                origin: format!("mismatch at position {}", record.position),
                field: "number_of_sequences",
                value: record.sample_count.to_string(),
            });
        }
        max_rate = max_rate.max(rate);
    }

    let hi = if max_rate < LOW_RATE_THRESHOLD {
        rate_ceiling(mode)
    } else {
        max_rate * RATE_HEADROOM
    };
    Ok(Interval::new(0.0, hi))
}

pub fn rate_ceiling(mode: ViewMode) -> f64 {
    if mode.is_single_strand() {
        STRAND_RATE_CEILING
    } else {
        OVERVIEW_RATE_CEILING
    }
}
