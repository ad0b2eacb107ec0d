use super::params::{Color, Layout, CAPTION_FONT_SIZE, TOOLTIP_FONT_SIZE};
use crate::dataset::DatasetStore;
use pipeplot::{Anchor, Command, Rect, Shape, Text};

/// Scene groups in paint order
pub const LAYERS: [&str; 6] = ["axes", "bars", "regions", "sequence", "legend", "overlay"];

pub const SEQUENCE_GROUP: &str = "sequence";
pub const AMPLICON_ID: &str = "amplicon-length";
pub const TOOLTIP_ID: &str = "tooltip";

/// Static annotations drawn once per session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Legend {
    pub organism: String,
    pub sequences: Option<u32>,
}

impl Legend {
    pub fn new(organism: &str, store: &DatasetStore) -> Self {
        Self {
            organism: organism.to_string(),
            sequences: store.sequence_count(),
        }
    }
}

fn text(x: f64, y: f64, content: String, size: f64, anchor: Anchor) -> Shape {
    Shape::Text(Text {
        x,
        y,
        content,
        fill: Color::Caption.to_string(),
        size,
        anchor,
    })
}

fn create(id: &str, parent: Option<&str>, shape: Shape) -> Command {
    Command::Create {
        id: id.to_string(),
        parent: parent.map(str::to_string),
        shape,
    }
}

pub fn amplicon_caption(layout: &Layout, amplicon_length: i64) -> Shape {
    text(
        layout.legend_x(),
        75.0,
        format!("Amplicon Length: {}", amplicon_length),
        CAPTION_FONT_SIZE,
        Anchor::Start,
    )
}

pub fn tooltip_shape(left: f64, top: f64, content: &str) -> Shape {
    Shape::Text(Text {
        x: left,
        y: top,
        content: content.to_string(),
        fill: Color::Tooltip.to_string(),
        size: TOOLTIP_FONT_SIZE,
        anchor: Anchor::Start,
    })
}

/// Commands that build the layer groups, axis lines, captions, legend and the
/// hidden tooltip
pub fn scaffold(layout: &Layout, legend: &Legend, amplicon_length: i64) -> Vec<Command> {
    let mut commands: Vec<Command> = LAYERS
        .iter()
        .map(|layer| create(layer, None, Shape::Group))
        .collect();

    let margins = &layout.margins;
    let (plot_left, plot_right) = layout.x_range();
    let axis_y = layout.x_axis_y();
    let axis_top = layout.y_range().1 - margins.top;
    commands.push(create(
        "x-axis-line",
        Some("axes"),
        Shape::Rect(Rect {
            x: plot_left,
            y: axis_y,
            width: plot_right - plot_left,
            height: 1.0,
            fill: Color::Axis.to_string(),
        }),
    ));
    commands.push(create(
        "y-axis-line",
        Some("axes"),
        Shape::Rect(Rect {
            x: plot_left - 1.0,
            y: axis_top,
            width: 1.0,
            height: axis_y - axis_top,
            fill: Color::Axis.to_string(),
        }),
    ));
    commands.push(create(
        "title",
        Some("axes"),
        text(
            layout.width / 2.0,
            16.0,
            format!("CoPrimer Mismatch Visualization for {}", legend.organism),
            CAPTION_FONT_SIZE,
            Anchor::Middle,
        ),
    ));
    commands.push(create(
        "y-caption",
        Some("axes"),
        text(
            plot_left + 6.0,
            axis_top + 26.0,
            "Percent mismatches".to_string(),
            CAPTION_FONT_SIZE,
            Anchor::Start,
        ),
    ));
    commands.push(create(
        "x-caption",
        Some("axes"),
        text(
            layout.width / 2.0,
            layout.height - 20.0,
            "Genome position".to_string(),
            CAPTION_FONT_SIZE,
            Anchor::Middle,
        ),
    ));

    let legend_x = layout.legend_x();
    let swatches = [
        ("forward", Color::Forward, "Forward Co-Primer", 5.0),
        ("reverse", Color::Reverse, "Reverse Co-Primer", 25.0),
    ];
    for (strand, color, label, y) in swatches {
        commands.push(create(
            &format!("legend-{}-swatch", strand),
            Some("legend"),
            Shape::Rect(Rect {
                x: legend_x,
                y,
                width: 20.0,
                height: 10.0,
                fill: color.to_string(),
            }),
        ));
        commands.push(create(
            &format!("legend-{}-label", strand),
            Some("legend"),
            text(legend_x + 30.0, y + 10.0, label.to_string(), CAPTION_FONT_SIZE, Anchor::Start),
        ));
    }
    if let Some(sequences) = legend.sequences {
        commands.push(create(
            "legend-sequences",
            Some("legend"),
            text(
                legend_x,
                55.0,
                format!("Number of sequences: {}", sequences),
                CAPTION_FONT_SIZE,
                Anchor::Start,
            ),
        ));
    }
    commands.push(create(
        AMPLICON_ID,
        Some("legend"),
        amplicon_caption(layout, amplicon_length),
    ));

    commands.push(create(TOOLTIP_ID, Some("overlay"), tooltip_shape(0.0, 0.0, "")));
    commands.push(Command::SetVisible {
        id: TOOLTIP_ID.to_string(),
        visible: false,
    });
    commands
}
