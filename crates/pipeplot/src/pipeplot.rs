pub type Color = String;
pub type ElementId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Anchor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
}

/// A text label; `content` may span several lines separated by `\n`
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub fill: Color,
    pub size: f64,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group,
    Rect(Rect),
    Text(Text),
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Group => "group",
            Shape::Rect(_) => "rect",
            Shape::Text(_) => "text",
        }
    }

    pub fn same_kind(&self, other: &Shape) -> bool {
        self.kind() == other.kind()
    }

    pub fn x(&self) -> Option<f64> {
        match self {
            Shape::Group => None,
            Shape::Rect(rect) => Some(rect.x),
            Shape::Text(text) => Some(text.x),
        }
    }

    pub fn fill(&self) -> Option<&str> {
        match self {
            Shape::Group => None,
            Shape::Rect(rect) => Some(&rect.fill),
            Shape::Text(text) => Some(&text.fill),
        }
    }
}

/// What happens to an element once its transition has run to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnEnd {
    Keep,
    Remove,
}

/// Animate the current attributes of an element towards `to` over `duration` milliseconds
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub to: Shape,
    pub duration: f64,
    pub on_end: OnEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create {
        id: ElementId,
        parent: Option<ElementId>,
        shape: Shape,
    },
    /// Replace the attributes of an element. A running transition keeps its
    /// clock and is retargeted to the new attributes.
    Update { id: ElementId, shape: Shape },
    Remove { id: ElementId },
    SetVisible { id: ElementId, visible: bool },
    Transition {
        id: ElementId,
        transition: Transition,
    },
}

/// Fired when a transition finishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub id: ElementId,
    pub removed: bool,
}

pub trait Backend {
    fn apply(&mut self, command: Command) -> Result<(), String>;

    /// Moves the clock forward and reports the transitions that finished
    fn advance(&mut self, elapsed: f64) -> Vec<Completion>;

    /// Jumps every running transition to its end state
    fn finish_transitions(&mut self) -> Vec<Completion>;
}

#[derive(Debug, Clone)]
pub struct FontConfig {
    pub family: String,
    pub weight: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Helvetica, Arial, sans-serif".to_string(),
            weight: "400".to_string(),
        }
    }
}
