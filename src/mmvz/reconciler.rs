use super::axis::axis_ticks;
use super::chrome::{self, Legend, AMPLICON_ID, SEQUENCE_GROUP};
use super::diff::keyed_diff;
use super::domain::ResolvedDomain;
use super::element::{bar_width, with_fill, Bars, Category, Frame, Glyphs, Regions, Ticks};
use super::params::Layout;
use super::regions::primer_regions;
use super::scale::Scales;
use super::view_state::ViewMode;
use crate::error::VizError;
use pipeplot::{Backend, Command, OnEnd, Shape, Transition};
use std::collections::BTreeMap;
use std::fmt;

/// Element counts of one category for one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryReport {
    pub entered: usize,
    pub updated: usize,
    /// Updates whose geometry actually moved
    pub changed: usize,
    pub exited: usize,
}

impl fmt::Display for CategoryReport {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "+{} ~{}/{} -{}",
            self.entered, self.changed, self.updated, self.exited
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub bars: CategoryReport,
    pub regions: CategoryReport,
    pub glyphs: CategoryReport,
    pub ticks: CategoryReport,
    pub sequence_visible: bool,
    pub amplicon_length: i64,
}

impl ReconcileReport {
    fn categories(&self) -> [&CategoryReport; 4] {
        [&self.bars, &self.regions, &self.glyphs, &self.ticks]
    }

    pub fn entered(&self) -> usize {
        self.categories().iter().map(|report| report.entered).sum()
    }

    pub fn exited(&self) -> usize {
        self.categories().iter().map(|report| report.exited).sum()
    }

    pub fn changed(&self) -> usize {
        self.categories().iter().map(|report| report.changed).sum()
    }
}

struct Plan<K> {
    commands: Vec<Command>,
    committed: BTreeMap<K, Shape>,
    report: CategoryReport,
}

/// Target geometry last issued for every live element of one category
struct Tracked<C: Category> {
    committed: BTreeMap<C::Key, Shape>,
}

impl<C: Category> Tracked<C> {
    fn new() -> Self {
        Self {
            committed: BTreeMap::new(),
        }
    }

    /// Computes the commands that take this category from its committed targets
    /// to the targets implied by `data`. Nothing is touched on failure.
    fn plan<'d, I>(&self, data: I, frame: &Frame) -> Result<Plan<C::Key>, VizError>
    where
        C::Datum: 'd,
        I: IntoIterator<Item = &'d C::Datum>,
    {
        let targets = data
            .into_iter()
            .map(|datum| -> Result<_, VizError> { Ok((C::key(datum), C::geometry(datum, frame)?)) })
            .collect::<Result<Vec<_>, _>>()?;

        let diff = keyed_diff(&self.committed, targets.iter().map(|(key, shape)| (key.clone(), shape)));
        let duration = frame.layout.duration;
        let transition = |id: String, to: Shape, on_end: OnEnd| Command::Transition {
            id,
            transition: Transition {
                to,
                duration,
                on_end,
            },
        };

        let mut plan = Plan {
            commands: Vec::new(),
            committed: BTreeMap::new(),
            report: CategoryReport::default(),
        };

        for (key, target) in diff.enter {
            let id = C::element_id(&key);
            match C::enter_from(target, frame) {
                Some(start) => {
                    plan.commands.push(Command::Create {
                        id: id.clone(),
                        parent: Some(C::LAYER.to_string()),
                        shape: start,
                    });
                    plan.commands.push(transition(id, target.clone(), OnEnd::Keep));
                }
                None => plan.commands.push(Command::Create {
                    id,
                    parent: Some(C::LAYER.to_string()),
                    shape: target.clone(),
                }),
            }
            plan.committed.insert(key, target.clone());
            plan.report.entered += 1;
        }

        for (key, target) in diff.update {
            plan.report.updated += 1;
            if self.committed.get(&key) != Some(target) {
                plan.commands.push(transition(C::element_id(&key), target.clone(), OnEnd::Keep));
                plan.report.changed += 1;
            }
            plan.committed.insert(key, target.clone());
        }

        for key in diff.exit {
            if let Some(current) = self.committed.get(&key) {
                plan.commands.push(transition(
                    C::element_id(&key),
                    C::exit_to(current, frame),
                    OnEnd::Remove,
                ));
            }
            plan.report.exited += 1;
        }

        Ok(plan)
    }
}

/// Keeps the rendered scene in step with the resolved domain.
///
/// Every pass first plans all categories against the targets committed by the
/// previous pass, then settles in-flight transitions on the backend and only then
/// issues commands. A pass that fails while planning leaves the scene untouched.
pub struct SceneReconciler {
    layout: Layout,
    legend: Legend,
    bars: Tracked<Bars>,
    regions: Tracked<Regions>,
    glyphs: Tracked<Glyphs>,
    ticks: Tracked<Ticks>,
    frame: Option<Frame>,
    sequence_visible: Option<bool>,
    amplicon_length: Option<i64>,
}

impl SceneReconciler {
    pub fn new(layout: Layout, legend: Legend) -> Self {
        Self {
            layout,
            legend,
            bars: Tracked::new(),
            regions: Tracked::new(),
            glyphs: Tracked::new(),
            ticks: Tracked::new(),
            frame: None,
            sequence_visible: None,
            amplicon_length: None,
        }
    }

    /// Geometry of the last applied pass
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn has_bar(&self, position: i64) -> bool {
        self.bars.committed.contains_key(&position)
    }

    pub fn reconcile<B: Backend>(
        &mut self,
        domain: &ResolvedDomain,
        mode: ViewMode,
        hovered: Option<i64>,
        backend: &mut B,
    ) -> Result<ReconcileReport, VizError> {
        let scales = Scales::build(domain, &self.layout)?;
        let frame = Frame {
            layout: self.layout,
            scales,
            mode,
            bar_width: bar_width(self.layout.width, domain.active.len()),
            hovered,
        };

        let regions = primer_regions(domain.forward, domain.reverse);
        let ticks = axis_ticks(&scales);
        let bars = self.bars.plan(domain.active.iter().copied(), &frame)?;
        let regions = self.regions.plan(regions.iter(), &frame)?;
        let glyphs = self.glyphs.plan(domain.active.iter().copied(), &frame)?;
        let ticks = self.ticks.plan(ticks.iter(), &frame)?;

        let mut commands = Vec::new();
        match self.amplicon_length {
            None => commands.extend(chrome::scaffold(&self.layout, &self.legend, domain.amplicon_length)),
            Some(previous) if previous != domain.amplicon_length => commands.push(Command::Update {
                id: AMPLICON_ID.to_string(),
                shape: chrome::amplicon_caption(&self.layout, domain.amplicon_length),
            }),
            Some(_) => {}
        }
        for plan in [&bars.commands, &regions.commands, &glyphs.commands, &ticks.commands] {
            commands.extend(plan.iter().cloned());
        }
        let sequence_visible = mode.shows_sequence();
        if self.sequence_visible != Some(sequence_visible) {
            commands.push(Command::SetVisible {
                id: SEQUENCE_GROUP.to_string(),
                visible: sequence_visible,
            });
        }

        let settled = backend.finish_transitions();
        if !settled.is_empty() {
            log::trace!("Settled {} in-flight transitions", settled.len());
        }
        let issued = commands.len();
        for command in commands {
            backend.apply(command).map_err(VizError::Backend)?;
        }

        let report = ReconcileReport {
            bars: bars.report,
            regions: regions.report,
            glyphs: glyphs.report,
            ticks: ticks.report,
            sequence_visible,
            amplicon_length: domain.amplicon_length,
        };
        log::debug!(
            "{} view [{}]: bars {}, regions {}, glyphs {}, ticks {} ({} commands)",
            mode,
            domain.x,
            report.bars,
            report.regions,
            report.glyphs,
            report.ticks,
            issued
        );

        self.bars.committed = bars.committed;
        self.regions.committed = regions.committed;
        self.glyphs.committed = glyphs.committed;
        self.ticks.committed = ticks.committed;
        self.sequence_visible = Some(sequence_visible);
        self.amplicon_length = Some(domain.amplicon_length);
        self.frame = Some(frame);
        Ok(report)
    }

    /// Switches the highlight of one rendered bar without a full pass.
    /// Returns false when no bar is drawn for `position`.
    pub fn restyle_bar<B: Backend>(
        &mut self,
        position: i64,
        hovered: bool,
        backend: &mut B,
    ) -> Result<bool, VizError> {
        let Some(frame) = self.frame.as_mut() else {
            return Ok(false);
        };
        let Some(current) = self.bars.committed.get_mut(&position) else {
            return Ok(false);
        };

        frame.hovered = match (hovered, frame.hovered) {
            (true, _) => Some(position),
            (false, Some(previous)) if previous == position => None,
            (false, previous) => previous,
        };
        let fill = Bars::fill(position, hovered.then_some(position)).to_string();
        if current.fill() == Some(fill.as_str()) {
            return Ok(true);
        }
        let restyled = with_fill(current, fill);
        backend
            .apply(Command::Update {
                id: Bars::element_id(&position),
                shape: restyled.clone(),
            })
            .map_err(VizError::Backend)?;
        *current = restyled;
        Ok(true)
    }
}
