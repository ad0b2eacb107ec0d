use crate::dataset::{DatasetStore, Strand};
use std::{fmt, str::FromStr};

/// Which genome window is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// Both primers and the amplicon between them
    #[default]
    Default,
    ForwardOnly,
    ReverseOnly,
    FullGenome,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Default,
        ViewMode::ForwardOnly,
        ViewMode::ReverseOnly,
        ViewMode::FullGenome,
    ];

    /// Label used by the view selector
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Default => "Default",
            ViewMode::ForwardOnly => "Forward",
            ViewMode::ReverseOnly => "Reverse",
            ViewMode::FullGenome => "Full Genome",
        }
    }

    pub fn is_single_strand(&self) -> bool {
        matches!(self, ViewMode::ForwardOnly | ViewMode::ReverseOnly)
    }

    /// The base letters are only legible in the single-primer windows
    pub fn shows_sequence(&self) -> bool {
        self.is_single_strand()
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.label())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|c| !matches!(*c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "default" => Ok(ViewMode::Default),
            "forward" | "forwardonly" => Ok(ViewMode::ForwardOnly),
            "reverse" | "reverseonly" => Ok(ViewMode::ReverseOnly),
            "fullgenome" | "full" | "genome" => Ok(ViewMode::FullGenome),
            _ => Err(format!(
                "Invalid view '{}': expected one of Default, Forward, Reverse, Full Genome",
                value
            )),
        }
    }
}

/// What should be on screen: the selected primer names and the view mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub forward: Option<String>,
    pub reverse: Option<String>,
    pub mode: ViewMode,
}

impl ViewState {
    pub fn new(forward: impl Into<String>, reverse: impl Into<String>, mode: ViewMode) -> Self {
        Self {
            forward: Some(forward.into()),
            reverse: Some(reverse.into()),
            mode,
        }
    }

    /// First primer of each strand, default view; mirrors freshly populated selectors
    pub fn initial(store: &DatasetStore) -> Self {
        let first = |strand: Strand| store.primers(strand).first().map(|primer| primer.name.clone());
        Self {
            forward: first(Strand::Forward),
            reverse: first(Strand::Reverse),
            mode: ViewMode::Default,
        }
    }

    pub fn selected(&self, strand: Strand) -> Option<&str> {
        match strand {
            Strand::Forward => self.forward.as_deref(),
            Strand::Reverse => self.reverse.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PrimerRecord;

    #[test]
    fn parse_view_labels() {
        for mode in ViewMode::ALL {
            assert_eq!(mode.label().parse::<ViewMode>(), Ok(mode));
        }
        assert_eq!("full-genome".parse::<ViewMode>(), Ok(ViewMode::FullGenome));
        assert_eq!("ReverseOnly".parse::<ViewMode>(), Ok(ViewMode::ReverseOnly));
        assert!("sideways".parse::<ViewMode>().is_err());
    }

    #[test]
    fn sequence_track_only_in_single_strand_views() {
        assert!(!ViewMode::Default.shows_sequence());
        assert!(ViewMode::ForwardOnly.shows_sequence());
        assert!(ViewMode::ReverseOnly.shows_sequence());
        assert!(!ViewMode::FullGenome.shows_sequence());
    }

    #[test]
    fn initial_state_selects_first_primers() {
        let store = DatasetStore::new(
            Vec::new(),
            vec![
                PrimerRecord::new("F1", 100, 130, 20, 15),
                PrimerRecord::new("F2", 150, 180, 20, 15),
            ],
            vec![PrimerRecord::new("R1", 400, 430, 20, 15)],
        );
        let state = ViewState::initial(&store);
        assert_eq!(state, ViewState::new("F1", "R1", ViewMode::Default));
        assert_eq!(state.selected(Strand::Reverse), Some("R1"));
    }

    #[test]
    fn initial_state_without_primers_has_no_selection() {
        let state = ViewState::initial(&DatasetStore::default());
        assert_eq!(state.forward, None);
        assert_eq!(state.reverse, None);
    }
}
