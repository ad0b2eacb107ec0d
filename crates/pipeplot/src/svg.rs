use crate::canvas::Canvas;
use crate::pipeplot::{FontConfig, Rect, Shape, Text};
use std::{fs, path::Path};

const LINE_HEIGHT_EM: f64 = 1.2;

/// Serialize the canvas as it looks at its current clock
pub fn generate_string(canvas: &Canvas) -> String {
    let mut generator = Generator::new();
    generator.generate(canvas);
    generator.buffer
}

pub fn render_to_file(canvas: &Canvas, path: &Path) -> Result<(), String> {
    fs::write(path, generate_string(canvas))
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

struct Generator {
    buffer: String,
}

impl Generator {
    fn new() -> Self {
        Self {
            buffer: String::with_capacity(10_000),
        }
    }

    fn generate(&mut self, canvas: &Canvas) {
        self.start_svg(canvas.width(), canvas.height());
        self.add_background();
        self.plot_children(canvas, None);
        self.end_svg();
    }

    fn add_line(&mut self, line: &str) {
        self.buffer.reserve(line.len() + 1);
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    fn plot_children(&mut self, canvas: &Canvas, parent: Option<&str>) {
        let ids: Vec<&str> = canvas.children(parent).collect();
        for id in ids {
            let Some(shape) = canvas.shape(id) else {
                continue;
            };
            let hidden = canvas.is_self_visible(id) == Some(false);
            match &shape {
                Shape::Group => {
                    let visibility = if hidden { r#" visibility="hidden""# } else { "" };
                    self.add_line(&format!(r#"<g id="{}"{}>"#, escape(id), visibility));
                    self.plot_children(canvas, Some(id));
                    self.add_line("</g>");
                }
                Shape::Rect(rect) => self.add_rect(id, rect, hidden),
                Shape::Text(text) => self.add_text(id, text, hidden, &canvas.font),
            }
        }
    }

    fn add_rect(&mut self, id: &str, rect: &Rect, hidden: bool) {
        let pos = format!("x=\"{}\" y=\"{}\"", num(rect.x), num(rect.y));
        let dim = format!("width=\"{}\" height=\"{}\"", num(rect.width), num(rect.height));
        let visibility = if hidden { r#" visibility="hidden""# } else { "" };
        let line = format!(
            r#"<rect id="{}" {} {} fill="{}"{} />"#,
            escape(id),
            pos,
            dim,
            rect.fill,
            visibility
        );
        self.add_line(&line);
    }

    fn add_text(&mut self, id: &str, text: &Text, hidden: bool, font: &FontConfig) {
        let font_style = format!(
            r#"font-family="{}" font-weight="{}" font-size="{}px""#,
            font.family,
            font.weight,
            num(text.size)
        );
        let visibility = if hidden { r#" visibility="hidden""# } else { "" };
        let open = format!(
            r#"<text id="{}" x="{}" y="{}" {} fill="{}" text-anchor="{}"{}>"#,
            escape(id),
            num(text.x),
            num(text.y),
            font_style,
            text.fill,
            text.anchor.as_svg(),
            visibility
        );

        let mut lines = text.content.lines();
        let Some(first) = lines.next() else {
            self.add_line(&format!("{}</text>", open));
            return;
        };
        let rest: Vec<&str> = lines.collect();
        if rest.is_empty() {
            self.add_line(&format!("{}{}</text>", open, escape(first)));
            return;
        }

        self.add_line(&open);
        self.add_line(&format!(r#"<tspan x="{}">{}</tspan>"#, num(text.x), escape(first)));
        for line in rest {
            self.add_line(&format!(
                r#"<tspan x="{}" dy="{}em">{}</tspan>"#,
                num(text.x),
                LINE_HEIGHT_EM,
                escape(line)
            ));
        }
        self.add_line("</text>");
    }

    fn start_svg(&mut self, width: f64, height: f64) {
        self.add_line(r#"<?xml version="1.0"?>"#);
        let line = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}">"#,
            num(width),
            num(height)
        );
        self.add_line(&line);
    }

    fn end_svg(&mut self) {
        self.add_line("</svg>");
    }

    fn add_background(&mut self) {
        self.add_line(r#"<rect width="100%" height="100%" fill="white"/>"#);
    }
}

/// Compact decimal rendering: at most three fractional digits, no trailing zeros
fn num(value: f64) -> String {
    let rendered = format!("{:.3}", value);
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
