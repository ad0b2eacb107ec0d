use crate::pipeplot::{
    Backend, Color, Command, Completion, ElementId, FontConfig, OnEnd, Rect, Shape, Text,
    Transition,
};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct Running {
    from: Shape,
    to: Shape,
    started: f64,
    duration: f64,
    on_end: OnEnd,
}

impl Running {
    fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started) / self.duration).clamp(0.0, 1.0)
    }

    fn is_done(&self, now: f64) -> bool {
        now - self.started >= self.duration
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<ElementId>,
    shape: Shape,
    visible: bool,
    running: Option<Running>,
    children: Vec<ElementId>,
}

/// In-memory scene that executes drawing commands and keeps its own clock
#[derive(Debug)]
pub struct Canvas {
    width: f64,
    height: f64,
    pub font: FontConfig,
    now: f64,
    order: Vec<ElementId>,
    roots: Vec<ElementId>,
    nodes: HashMap<ElementId, Node>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            font: FontConfig::default(),
            now: 0.0,
            order: Vec::new(),
            roots: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    pub fn set_font_family(&mut self, font_family: &str) {
        self.font.family = font_family.to_owned();
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Attributes of an element at the current clock, mid-transition if one is running
    pub fn shape(&self, id: &str) -> Option<Shape> {
        let node = self.nodes.get(id)?;
        Some(match &node.running {
            Some(running) => interpolate(&running.from, &running.to, ease_cubic_in_out(running.progress(self.now))),
            None => node.shape.clone(),
        })
    }

    pub fn is_animating(&self, id: &str) -> bool {
        self.nodes.get(id).is_some_and(|node| node.running.is_some())
    }

    /// An element is shown only if it and all of its ancestors are visible
    pub fn is_visible(&self, id: &str) -> bool {
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            if !node.visible {
                return false;
            }
            current = node.parent.as_ref().and_then(|parent| self.nodes.get(parent));
        }
        self.nodes.contains_key(id)
    }

    pub fn is_self_visible(&self, id: &str) -> Option<bool> {
        self.nodes.get(id).map(|node| node.visible)
    }

    /// Ids of the direct children of `parent` (root elements for `None`) in creation order
    pub fn children(&self, parent: Option<&str>) -> impl Iterator<Item = &str> + '_ {
        let ids = match parent {
            None => self.roots.as_slice(),
            Some(parent) => self
                .nodes
                .get(parent)
                .map_or(&[][..], |node| node.children.as_slice()),
        };
        ids.iter().map(String::as_str)
    }

    pub fn ids_in(&self, parent: &str) -> Vec<&str> {
        self.children(Some(parent)).collect()
    }

    fn create(&mut self, id: ElementId, parent: Option<ElementId>, shape: Shape) -> Result<(), String> {
        if self.nodes.contains_key(&id) {
            return Err(format!("Element '{}' already exists", id));
        }
        match &parent {
            Some(parent_id) => match self.nodes.get_mut(parent_id) {
                Some(node) if node.shape == Shape::Group => node.children.push(id.clone()),
                Some(_) => return Err(format!("Parent '{}' of '{}' is not a group", parent_id, id)),
                None => return Err(format!("Parent '{}' of '{}' does not exist", parent_id, id)),
            },
            None => self.roots.push(id.clone()),
        }
        self.order.push(id.clone());
        self.nodes.insert(
            id,
            Node {
                parent,
                shape,
                visible: true,
                running: None,
                children: Vec::new(),
            },
        );
        Ok(())
    }

    fn update(&mut self, id: &str, shape: Shape) -> Result<(), String> {
        let node = self.node_mut(id)?;
        if !node.shape.same_kind(&shape) {
            return Err(format!(
                "Cannot update {} '{}' with a {}",
                node.shape.kind(),
                id,
                shape.kind()
            ));
        }
        match &mut node.running {
            Some(running) => running.to = shape,
            None => node.shape = shape,
        }
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<(), String> {
        if !self.nodes.contains_key(id) {
            return Err(format!("Cannot remove unknown element '{}'", id));
        }
        self.remove_all(vec![id.to_string()]);
        Ok(())
    }

    /// Drops the given elements and their descendants with a single sweep over
    /// the creation order
    fn remove_all(&mut self, ids: Vec<ElementId>) {
        let mut doomed = HashSet::new();
        let mut parents = HashSet::new();
        let mut stack = ids;
        while let Some(id) = stack.pop() {
            if doomed.contains(&id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().cloned());
                parents.insert(node.parent.clone());
                doomed.insert(id);
            }
        }
        if doomed.is_empty() {
            return;
        }

        for id in &doomed {
            self.nodes.remove(id);
        }
        for parent in parents {
            match parent {
                None => self.roots.retain(|id| !doomed.contains(id)),
                // Parents removed in this sweep are already gone
                Some(parent) => {
                    if let Some(node) = self.nodes.get_mut(&parent) {
                        node.children.retain(|id| !doomed.contains(id));
                    }
                }
            }
        }
        self.order.retain(|id| !doomed.contains(id));
    }

    fn start_transition(&mut self, id: &str, transition: Transition) -> Result<(), String> {
        let now = self.now;
        let from = self
            .shape(id)
            .ok_or_else(|| format!("Cannot animate unknown element '{}'", id))?;
        if from == Shape::Group || !from.same_kind(&transition.to) {
            return Err(format!(
                "Cannot animate {} '{}' towards a {}",
                from.kind(),
                id,
                transition.to.kind()
            ));
        }
        let node = self.node_mut(id)?;
        node.running = Some(Running {
            from,
            to: transition.to,
            started: now,
            duration: transition.duration.max(0.0),
            on_end: transition.on_end,
        });
        Ok(())
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node, String> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| format!("Unknown element '{}'", id))
    }

    fn complete(&mut self, force: bool) -> Vec<Completion> {
        let now = self.now;
        let finished: Vec<ElementId> = self
            .order
            .iter()
            .filter(|id| {
                self.nodes[*id]
                    .running
                    .as_ref()
                    .is_some_and(|running| force || running.is_done(now))
            })
            .cloned()
            .collect();

        let mut completions = Vec::with_capacity(finished.len());
        let mut exits = Vec::new();
        for id in finished {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            let Some(running) = node.running.take() else {
                continue;
            };
            node.shape = running.to;
            let removed = running.on_end == OnEnd::Remove;
            if removed {
                exits.push(id.clone());
            }
            completions.push(Completion { id, removed });
        }
        self.remove_all(exits);
        completions
    }
}

impl Backend for Canvas {
    fn apply(&mut self, command: Command) -> Result<(), String> {
        match command {
            Command::Create { id, parent, shape } => self.create(id, parent, shape),
            Command::Update { id, shape } => self.update(&id, shape),
            Command::Remove { id } => self.remove(&id),
            Command::SetVisible { id, visible } => {
                self.node_mut(&id)?.visible = visible;
                Ok(())
            }
            Command::Transition { id, transition } => self.start_transition(&id, transition),
        }
    }

    fn advance(&mut self, elapsed: f64) -> Vec<Completion> {
        self.now += elapsed.max(0.0);
        self.complete(false)
    }

    fn finish_transitions(&mut self) -> Vec<Completion> {
        self.complete(true)
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn interpolate(from: &Shape, to: &Shape, t: f64) -> Shape {
    if t >= 1.0 {
        return to.clone();
    }
    match (from, to) {
        (Shape::Rect(a), Shape::Rect(b)) => Shape::Rect(Rect {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
            width: lerp(a.width, b.width, t),
            height: lerp(a.height, b.height, t),
            fill: lerp_color(&a.fill, &b.fill, t),
        }),
        (Shape::Text(a), Shape::Text(b)) => Shape::Text(Text {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
            content: b.content.clone(),
            fill: lerp_color(&a.fill, &b.fill, t),
            size: lerp(a.size, b.size, t),
            anchor: b.anchor,
        }),
        _ => to.clone(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn lerp_color(from: &Color, to: &Color, t: f64) -> Color {
    if from == to {
        return to.clone();
    }
    match (parse_hex(from), parse_hex(to)) {
        (Some(a), Some(b)) => {
            let mix = |x: u8, y: u8| lerp(x as f64, y as f64, t).round() as u8;
            format!("#{:02X}{:02X}{:02X}", mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
        }
        _ => from.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeplot::Anchor;

    fn rect(x: f64, fill: &str) -> Shape {
        Shape::Rect(Rect {
            x,
            y: 10.0,
            width: 4.0,
            height: 20.0,
            fill: fill.to_string(),
        })
    }

    fn create(canvas: &mut Canvas, id: &str, parent: Option<&str>, shape: Shape) {
        canvas
            .apply(Command::Create {
                id: id.to_string(),
                parent: parent.map(str::to_string),
                shape,
            })
            .unwrap();
    }

    fn animate(canvas: &mut Canvas, id: &str, to: Shape, on_end: OnEnd) {
        canvas
            .apply(Command::Transition {
                id: id.to_string(),
                transition: Transition {
                    to,
                    duration: 1000.0,
                    on_end,
                },
            })
            .unwrap();
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let mut canvas = Canvas::new(100.0, 100.0);
        create(&mut canvas, "a", None, rect(0.0, "#000000"));
        let result = canvas.apply(Command::Create {
            id: "a".to_string(),
            parent: None,
            shape: rect(0.0, "#000000"),
        });
        assert_eq!(result, Err("Element 'a' already exists".to_string()));
    }

    #[test]
    fn create_requires_group_parent() {
        let mut canvas = Canvas::new(100.0, 100.0);
        create(&mut canvas, "a", None, rect(0.0, "#000000"));
        let result = canvas.apply(Command::Create {
            id: "b".to_string(),
            parent: Some("a".to_string()),
            shape: rect(0.0, "#000000"),
        });
        assert!(result.is_err());
        let result = canvas.apply(Command::Create {
            id: "b".to_string(),
            parent: Some("missing".to_string()),
            shape: rect(0.0, "#000000"),
        });
        assert!(result.is_err());
    }

    #[test]
    fn transition_interpolates_and_settles() {
        let mut canvas = Canvas::new(100.0, 100.0);
        create(&mut canvas, "a", None, rect(0.0, "#000000"));
        animate(&mut canvas, "a", rect(100.0, "#FFFFFF"), OnEnd::Keep);

        assert!(canvas.advance(500.0).is_empty());
        match canvas.shape("a").unwrap() {
            Shape::Rect(r) => {
                assert!((r.x - 50.0).abs() < 1e-9);
                assert_eq!(r.fill, "#808080");
            }
            other => panic!("unexpected shape {:?}", other),
        }

        let done = canvas.advance(500.0);
        assert_eq!(
            done,
            vec![Completion {
                id: "a".to_string(),
                removed: false
            }]
        );
        assert_eq!(canvas.shape("a"), Some(rect(100.0, "#FFFFFF")));
        assert!(!canvas.is_animating("a"));
    }

    #[test]
    fn exit_transition_removes_element() {
        let mut canvas = Canvas::new(100.0, 100.0);
        create(&mut canvas, "a", None, rect(0.0, "#000000"));
        animate(&mut canvas, "a", rect(100.0, "#000000"), OnEnd::Remove);
        assert!(canvas.contains("a"));
        let done = canvas.finish_transitions();
        assert_eq!(done.len(), 1);
        assert!(done[0].removed);
        assert!(!canvas.contains("a"));
        assert!(canvas.is_empty());
    }

    #[test]
    fn update_retargets_running_transition() {
        let mut canvas = Canvas::new(100.0, 100.0);
        create(&mut canvas, "a", None, rect(0.0, "#000000"));
        animate(&mut canvas, "a", rect(100.0, "#000000"), OnEnd::Keep);
        canvas.advance(250.0);
        canvas
            .apply(Command::Update {
                id: "a".to_string(),
                shape: rect(100.0, "#FF0000"),
            })
            .unwrap();
        assert!(canvas.is_animating("a"));
        canvas.finish_transitions();
        assert_eq!(canvas.shape("a"), Some(rect(100.0, "#FF0000")));
    }

    #[test]
    fn update_rejects_kind_change() {
        let mut canvas = Canvas::new(100.0, 100.0);
        create(&mut canvas, "a", None, rect(0.0, "#000000"));
        let text = Shape::Text(Text {
            x: 0.0,
            y: 0.0,
            content: "A".to_string(),
            fill: "#000000".to_string(),
            size: 12.0,
            anchor: Anchor::Start,
        });
        assert!(canvas
            .apply(Command::Update {
                id: "a".to_string(),
                shape: text
            })
            .is_err());
    }

    #[test]
    fn removing_group_removes_children() {
        let mut canvas = Canvas::new(100.0, 100.0);
        create(&mut canvas, "g", None, Shape::Group);
        create(&mut canvas, "a", Some("g"), rect(0.0, "#000000"));
        create(&mut canvas, "b", None, rect(0.0, "#000000"));
        canvas.apply(Command::Remove { id: "g".to_string() }).unwrap();
        assert!(!canvas.contains("a"));
        assert!(canvas.contains("b"));
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn settling_many_exits_keeps_survivors_in_order() {
        let mut canvas = Canvas::new(100.0, 100.0);
        create(&mut canvas, "g", None, Shape::Group);
        for index in 0..20_000 {
            create(&mut canvas, &format!("r{}", index), Some("g"), rect(index as f64, "#000000"));
        }
        for index in (0..20_000).filter(|index| index % 4 != 0) {
            animate(&mut canvas, &format!("r{}", index), rect(100.0, "#000000"), OnEnd::Remove);
        }

        let done = canvas.finish_transitions();
        assert_eq!(done.len(), 15_000);
        assert!(done.iter().all(|completion| completion.removed));
        assert_eq!(canvas.len(), 5_001);
        let kept = canvas.ids_in("g");
        assert_eq!(kept.len(), 5_000);
        assert_eq!(&kept[..3], &["r0", "r4", "r8"]);
        assert!(!canvas.contains("r1"));
    }

    #[test]
    fn removed_group_is_dropped_from_roots() {
        let mut canvas = Canvas::new(100.0, 100.0);
        create(&mut canvas, "g", None, Shape::Group);
        create(&mut canvas, "h", Some("g"), Shape::Group);
        create(&mut canvas, "a", Some("h"), rect(0.0, "#000000"));
        create(&mut canvas, "b", None, rect(0.0, "#000000"));
        canvas.apply(Command::Remove { id: "h".to_string() }).unwrap();
        assert_eq!(canvas.ids_in("g"), Vec::<&str>::new());
        canvas.apply(Command::Remove { id: "g".to_string() }).unwrap();
        assert_eq!(canvas.children(None).collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn visibility_is_inherited() {
        let mut canvas = Canvas::new(100.0, 100.0);
        create(&mut canvas, "g", None, Shape::Group);
        create(&mut canvas, "a", Some("g"), rect(0.0, "#000000"));
        canvas
            .apply(Command::SetVisible {
                id: "g".to_string(),
                visible: false,
            })
            .unwrap();
        assert!(!canvas.is_visible("a"));
        assert_eq!(canvas.is_self_visible("a"), Some(true));
        assert_eq!(canvas.ids_in("g"), vec!["a"]);
    }

    #[test]
    fn easing_is_symmetric() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.25) + ease_cubic_in_out(0.75) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_hex_colors_switch_at_end() {
        assert_eq!(lerp_color(&"red".to_string(), &"blue".to_string(), 0.5), "red");
        assert_eq!(parse_hex("#0a0B0c"), Some((10, 11, 12)));
        assert_eq!(parse_hex("#0a0B0"), None);
    }
}
