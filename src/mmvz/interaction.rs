use super::chrome::{tooltip_shape, Legend, TOOLTIP_ID};
use super::domain::resolve_domain;
use super::params::{Layout, TOOLTIP_OFFSET};
use super::reconciler::{ReconcileReport, SceneReconciler};
use super::view_state::{ViewMode, ViewState};
use crate::dataset::{DatasetStore, MismatchRecord};
use crate::error::VizError;
use pipeplot::{Backend, Command, Completion};
use std::str::FromStr;

/// User input accepted by a session
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ForwardChanged(String),
    ReverseChanged(String),
    ViewModeChanged(ViewMode),
    PointerEnter(i64),
    PointerLeave,
    /// Lets the animation clock run for the given number of milliseconds
    Wait(f64),
}

impl FromStr for Event {
    type Err = String;

    /// Parses one line of a session script, e.g. `forward F1` or `view Full Genome`
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let number = |what: &str| {
            rest.parse::<f64>()
                .map_err(|_| format!("Invalid {} '{}' in event '{}'", what, rest, line))
        };
        match verb.to_ascii_lowercase().as_str() {
            "forward" => Ok(Event::ForwardChanged(rest.to_string())),
            "reverse" => Ok(Event::ReverseChanged(rest.to_string())),
            "view" => Ok(Event::ViewModeChanged(rest.parse()?)),
            "hover" => rest
                .parse::<i64>()
                .map(Event::PointerEnter)
                .map_err(|_| format!("Invalid position '{}' in event '{}'", rest, line)),
            "leave" => Ok(Event::PointerLeave),
            "wait" => {
                let millis = number("duration")?;
                if millis < 0.0 || !millis.is_finite() {
                    return Err(format!("Invalid duration '{}' in event '{}'", rest, line));
                }
                Ok(Event::Wait(millis))
            }
            _ => Err(format!("Unknown event '{}'", line)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub left: f64,
    pub top: f64,
    pub text: String,
}

impl Tooltip {
    pub fn describe(record: &MismatchRecord) -> String {
        format!(
            "Position: {}\nNumber of mismatches: {}\nPercent Mismatches: {:.2}%\nMost common base: {}",
            record.position,
            record.mismatch_count,
            record.percent(),
            record.consensus_base
        )
    }
}

/// What handling an event did to the scene
#[derive(Debug)]
pub enum Outcome {
    Rendered(ReconcileReport),
    /// The pass did not run or failed; the previous frame stays on screen
    Kept(VizError),
    TooltipShown(Tooltip),
    TooltipHidden,
    /// The pointer is not over a rendered bar
    Ignored,
    Advanced(Vec<Completion>),
}

/// Owns the view state and drives one scene. Every event is handled to completion
/// before the next one is accepted.
pub struct Session<'a, B: Backend> {
    store: &'a DatasetStore,
    state: ViewState,
    reconciler: SceneReconciler,
    backend: B,
    hovered: Option<i64>,
}

impl<'a, B: Backend> Session<'a, B> {
    /// Starts with the first primer of each strand selected, like freshly filled selectors
    pub fn new(store: &'a DatasetStore, layout: Layout, legend: Legend, backend: B) -> Self {
        Self::with_state(store, ViewState::initial(store), layout, legend, backend)
    }

    pub fn with_state(
        store: &'a DatasetStore,
        state: ViewState,
        layout: Layout,
        legend: Legend,
        backend: B,
    ) -> Self {
        Self {
            store,
            state,
            reconciler: SceneReconciler::new(layout, legend),
            backend,
            hovered: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn hovered(&self) -> Option<i64> {
        self.hovered
    }

    /// Runs one full pass for the current view state
    pub fn render(&mut self) -> Result<ReconcileReport, VizError> {
        let domain = resolve_domain(&self.state, self.store)?;
        let report = self
            .reconciler
            .reconcile(&domain, self.state.mode, self.hovered, &mut self.backend)?;

        if let Some(position) = self.hovered {
            if self.reconciler.has_bar(position) {
                self.show_tooltip(position)?;
            } else {
                self.hovered = None;
                self.hide_tooltip()?;
            }
        }
        Ok(report)
    }

    pub fn handle(&mut self, event: Event) -> Outcome {
        log::debug!("Handling {:?}", event);
        let result = match event {
            Event::ForwardChanged(name) => {
                self.state.forward = Some(name);
                self.render().map(Outcome::Rendered)
            }
            Event::ReverseChanged(name) => {
                self.state.reverse = Some(name);
                self.render().map(Outcome::Rendered)
            }
            Event::ViewModeChanged(mode) => {
                self.state.mode = mode;
                self.render().map(Outcome::Rendered)
            }
            Event::PointerEnter(position) => self.pointer_enter(position),
            Event::PointerLeave => self.pointer_leave(),
            Event::Wait(millis) => Ok(Outcome::Advanced(self.advance(millis))),
        };

        result.unwrap_or_else(|err| {
            match &err {
                VizError::SelectionMissing { .. } => log::warn!("Skipping frame: {}", err),
                _ => log::error!("Keeping previous frame: {}", err),
            }
            Outcome::Kept(err)
        })
    }

    pub fn pointer_enter(&mut self, position: i64) -> Result<Outcome, VizError> {
        if !self.reconciler.has_bar(position) {
            return Ok(Outcome::Ignored);
        }
        if let Some(previous) = self.hovered.filter(|&previous| previous != position) {
            self.reconciler.restyle_bar(previous, false, &mut self.backend)?;
        }
        self.reconciler.restyle_bar(position, true, &mut self.backend)?;
        self.hovered = Some(position);
        match self.show_tooltip(position)? {
            Some(tooltip) => Ok(Outcome::TooltipShown(tooltip)),
            None => Ok(Outcome::Ignored),
        }
    }

    pub fn pointer_leave(&mut self) -> Result<Outcome, VizError> {
        if let Some(position) = self.hovered.take() {
            self.reconciler.restyle_bar(position, false, &mut self.backend)?;
        }
        self.hide_tooltip()?;
        Ok(Outcome::TooltipHidden)
    }

    pub fn advance(&mut self, millis: f64) -> Vec<Completion> {
        let completions = self.backend.advance(millis);
        if !completions.is_empty() {
            log::trace!("{} transitions completed", completions.len());
        }
        completions
    }

    /// Tooltip for a rendered bar, anchored at the bar's settled coordinates
    pub fn tooltip(&self, position: i64) -> Option<Tooltip> {
        let record = self.store.mismatch_at(position)?;
        let frame = self.reconciler.frame()?;
        Some(Tooltip {
            left: frame.scales.position_to_x(position as f64),
            top: frame.scales.rate_to_y(record.rate()) + TOOLTIP_OFFSET,
            text: Tooltip::describe(record),
        })
    }

    fn show_tooltip(&mut self, position: i64) -> Result<Option<Tooltip>, VizError> {
        let Some(tooltip) = self.tooltip(position) else {
            return Ok(None);
        };
        self.apply(Command::Update {
            id: TOOLTIP_ID.to_string(),
            shape: tooltip_shape(tooltip.left, tooltip.top, &tooltip.text),
        })?;
        self.apply(Command::SetVisible {
            id: TOOLTIP_ID.to_string(),
            visible: true,
        })?;
        Ok(Some(tooltip))
    }

    fn hide_tooltip(&mut self) -> Result<(), VizError> {
        // Nothing to hide before the first frame
        if self.reconciler.frame().is_none() {
            return Ok(());
        }
        self.apply(Command::SetVisible {
            id: TOOLTIP_ID.to_string(),
            visible: false,
        })
    }

    fn apply(&mut self, command: Command) -> Result<(), VizError> {
        self.backend.apply(command).map_err(VizError::Backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{PrimerRecord, Strand};
    use pipeplot::{Canvas, Shape};

    fn store() -> DatasetStore {
        let mismatches = (0..=600)
            .map(|position| MismatchRecord::new(position, (position % 5) as u32, 'C', 200))
            .collect();
        DatasetStore::new(
            mismatches,
            vec![
                PrimerRecord::new("F1", 100, 130, 20, 15),
                PrimerRecord::new("F2", 150, 180, 20, 15),
            ],
            vec![
                PrimerRecord::new("R1", 400, 430, 20, 15),
                PrimerRecord::new("R2", 500, 540, 20, 15),
            ],
        )
    }

    fn session(store: &DatasetStore) -> Session<'_, Canvas> {
        let layout = Layout::default();
        Session::new(
            store,
            layout,
            Legend::new("test", store),
            Canvas::new(layout.width, layout.height),
        )
    }

    fn tooltip_text(canvas: &Canvas) -> String {
        match canvas.shape(TOOLTIP_ID) {
            Some(Shape::Text(text)) => text.content,
            other => panic!("expected tooltip text, got {:?}", other),
        }
    }

    #[test]
    fn parse_script_lines() {
        assert_eq!("forward F1".parse::<Event>(), Ok(Event::ForwardChanged("F1".to_string())));
        assert_eq!(
            "reverse  primer two ".parse::<Event>(),
            Ok(Event::ReverseChanged("primer two".to_string()))
        );
        assert_eq!("view Full Genome".parse::<Event>(), Ok(Event::ViewModeChanged(ViewMode::FullGenome)));
        assert_eq!("hover 250".parse::<Event>(), Ok(Event::PointerEnter(250)));
        assert_eq!("leave".parse::<Event>(), Ok(Event::PointerLeave));
        assert_eq!("wait 750".parse::<Event>(), Ok(Event::Wait(750.0)));
        assert!("wait -1".parse::<Event>().is_err());
        assert!("hover here".parse::<Event>().is_err());
        assert!("zoom 2".parse::<Event>().is_err());
    }

    #[test]
    fn tooltip_text_format() {
        let record = MismatchRecord::new(1234, 7, 'G', 300);
        assert_eq!(
            Tooltip::describe(&record),
            "Position: 1234\nNumber of mismatches: 7\nPercent Mismatches: 2.33%\nMost common base: G"
        );
    }

    #[test]
    fn initial_render_uses_first_primers() {
        let store = store();
        let mut session = session(&store);
        let report = session.render().unwrap();
        assert_eq!(session.state(), &ViewState::new("F1", "R1", ViewMode::Default));
        assert_eq!(report.bars.entered, 351);
    }

    #[test]
    fn selector_events_mutate_one_field_each() {
        let store = store();
        let mut session = session(&store);
        session.render().unwrap();

        assert!(matches!(session.handle(Event::ReverseChanged("R2".to_string())), Outcome::Rendered(_)));
        assert_eq!(session.state(), &ViewState::new("F1", "R2", ViewMode::Default));
        assert!(matches!(session.handle(Event::ViewModeChanged(ViewMode::ReverseOnly)), Outcome::Rendered(_)));
        assert_eq!(session.state(), &ViewState::new("F1", "R2", ViewMode::ReverseOnly));
        assert!(matches!(session.handle(Event::ForwardChanged("F2".to_string())), Outcome::Rendered(_)));
        assert_eq!(session.state(), &ViewState::new("F2", "R2", ViewMode::ReverseOnly));
    }

    #[test]
    fn unknown_selection_keeps_last_frame() {
        let store = store();
        let mut session = session(&store);
        session.render().unwrap();
        session.handle(Event::Wait(2000.0));
        let before = pipeplot::generate_string(session.backend());

        match session.handle(Event::ForwardChanged("missing".to_string())) {
            Outcome::Kept(VizError::SelectionMissing { strand, .. }) => assert_eq!(strand, Strand::Forward),
            other => panic!("expected a kept frame, got {:?}", other),
        }
        assert_eq!(pipeplot::generate_string(session.backend()), before);

        assert!(matches!(session.handle(Event::ForwardChanged("F1".to_string())), Outcome::Rendered(_)));
    }

    #[test]
    fn empty_primer_lists_skip_rendering() {
        let store = DatasetStore::new(vec![MismatchRecord::new(1, 0, 'A', 10)], Vec::new(), Vec::new());
        let mut session = session(&store);
        assert!(matches!(
            session.render(),
            Err(VizError::SelectionMissing { name: None, .. })
        ));
        assert!(session.backend().is_empty());
        assert!(matches!(session.handle(Event::PointerEnter(1)), Outcome::Ignored));
        assert!(matches!(session.handle(Event::PointerLeave), Outcome::TooltipHidden));
    }

    #[test]
    fn hover_shows_and_hides_tooltip() {
        let store = store();
        let mut session = session(&store);
        session.render().unwrap();
        session.advance(1500.0);

        let tooltip = match session.handle(Event::PointerEnter(203)) {
            Outcome::TooltipShown(tooltip) => tooltip,
            other => panic!("expected tooltip, got {:?}", other),
        };
        let frame = *session.reconciler.frame().unwrap();
        assert_eq!(tooltip.left, frame.scales.position_to_x(203.0));
        assert_eq!(tooltip.top, frame.scales.rate_to_y(0.015) + 80.0);
        assert!(tooltip.text.contains("Percent Mismatches: 1.50%"));
        assert!(session.backend().is_visible(TOOLTIP_ID));
        assert_eq!(tooltip_text(session.backend()), tooltip.text);
        assert_eq!(session.hovered(), Some(203));

        // A second hover moves the highlight
        session.handle(Event::PointerEnter(204));
        let fill = |session: &Session<Canvas>, id: &str| {
            session.backend().shape(id).and_then(|shape| shape.fill().map(str::to_string))
        };
        assert_eq!(fill(&session, "bar-203"), Some("#4682B4".to_string()));
        assert_eq!(fill(&session, "bar-204"), Some("#E16A2C".to_string()));

        assert!(matches!(session.handle(Event::PointerLeave), Outcome::TooltipHidden));
        assert!(!session.backend().is_visible(TOOLTIP_ID));
        assert_eq!(fill(&session, "bar-204"), Some("#4682B4".to_string()));
        assert_eq!(session.hovered(), None);
    }

    #[test]
    fn hover_outside_the_window_is_ignored() {
        let store = store();
        let mut session = session(&store);
        session.render().unwrap();
        assert!(matches!(session.handle(Event::PointerEnter(10)), Outcome::Ignored));
        assert!(!session.backend().is_visible(TOOLTIP_ID));
    }

    #[test]
    fn hovered_bar_leaving_the_window_hides_tooltip() {
        let store = store();
        let mut session = session(&store);
        session.render().unwrap();
        session.handle(Event::PointerEnter(300));
        assert!(session.backend().is_visible(TOOLTIP_ID));

        session.handle(Event::ViewModeChanged(ViewMode::ForwardOnly));
        assert_eq!(session.hovered(), None);
        assert!(!session.backend().is_visible(TOOLTIP_ID));
    }

    #[test]
    fn waiting_removes_exited_bars() {
        let store = store();
        let mut session = session(&store);
        session.render().unwrap();
        session.handle(Event::ViewModeChanged(ViewMode::ForwardOnly));
        assert!(session.backend().contains("bar-300"));

        match session.handle(Event::Wait(1500.0)) {
            Outcome::Advanced(completions) => assert!(completions.iter().any(|c| c.id == "bar-300" && c.removed)),
            other => panic!("expected completions, got {:?}", other),
        }
        assert!(!session.backend().contains("bar-300"));
    }
}
