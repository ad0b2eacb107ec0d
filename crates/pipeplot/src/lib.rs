mod canvas;
mod pipeplot;
mod svg;

pub use canvas::Canvas;
pub use pipeplot::{
    Anchor, Backend, Color, Command, Completion, ElementId, FontConfig, OnEnd, Rect, Shape, Text,
    Transition,
};
pub use svg::{generate_string, render_to_file};
