use super::load_inputs;
use crate::cli::ReplayArgs;
use crate::mmvz::{
    chrome::Legend,
    interaction::{Event, Outcome, Session},
    view_state::ViewState,
};
use crate::utils::Result;
use pipeplot::{render_to_file, Backend, Canvas};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Reads a session script, skipping blank lines and `#` comments
pub fn read_script(path: &Path) -> Result<Vec<Event>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read script {}: {}", path.display(), e))?;
    parse_script(&text).map_err(|e| format!("{}: {}", path.display(), e))
}

pub fn parse_script(text: &str) -> Result<Vec<Event>> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_number, line)| {
            line.parse::<Event>()
                .map_err(|e| format!("line {}: {}", line_number, e))
        })
        .collect()
}

pub fn frame_path(prefix: &Path, index: usize) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!(".{:03}.svg", index));
    PathBuf::from(name)
}

pub fn replay(args: ReplayArgs) -> Result<()> {
    let events = read_script(&args.script)?;
    let store = load_inputs(&args.inputs)?;
    let state = args.selection.apply(ViewState::initial(&store));
    let layout = args.style.layout();

    let mut canvas = Canvas::new(layout.width, layout.height);
    if let Some(font_family) = &args.style.font_family {
        canvas.set_font_family(font_family);
    }
    let legend = Legend::new(&args.style.organism, &store);
    let mut session = Session::with_state(&store, state, layout, legend, canvas);

    // Frame 0 is the initial selection
    if let Err(err) = session.render() {
        log::warn!("Initial frame not rendered: {}", err);
    }
    write_frame(&mut session, &args, 0)?;

    let mut kept = 0;
    for (index, event) in events.into_iter().enumerate() {
        match session.handle(event) {
            Outcome::Rendered(report) => log::info!(
                "Frame {}: {} entered, {} exited",
                index + 1,
                report.entered(),
                report.exited()
            ),
            Outcome::Kept(_) => kept += 1,
            Outcome::TooltipShown(tooltip) => {
                log::debug!("Frame {}: tooltip {:?}", index + 1, tooltip.text)
            }
            Outcome::TooltipHidden | Outcome::Ignored | Outcome::Advanced(_) => {}
        }
        write_frame(&mut session, &args, index + 1)?;
    }

    if kept > 0 {
        log::warn!("{} events left the previous frame on screen", kept);
    }
    Ok(())
}

fn write_frame(session: &mut Session<Canvas>, args: &ReplayArgs, index: usize) -> Result<()> {
    if args.settle {
        session.backend_mut().finish_transitions();
    }
    let path = frame_path(&args.output_prefix, index);
    render_to_file(session.backend(), &path)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{InputArgs, SelectionArgs, StyleArgs};
    use crate::mmvz::params::Layout;
    use crate::mmvz::view_state::ViewMode;

    #[test]
    fn script_skips_comments_and_blank_lines() {
        let script = "# warm up\nforward F2\n\n  view reverse  \nhover 401\nleave\nwait 1500\n";
        assert_eq!(
            parse_script(script),
            Ok(vec![
                Event::ForwardChanged("F2".to_string()),
                Event::ViewModeChanged(ViewMode::ReverseOnly),
                Event::PointerEnter(401),
                Event::PointerLeave,
                Event::Wait(1500.0),
            ])
        );
    }

    #[test]
    fn script_errors_name_the_line() {
        let err = parse_script("forward F1\nzoom in\n").unwrap_err();
        assert!(err.starts_with("line 2: "), "{}", err);
    }

    #[test]
    fn frames_are_numbered() {
        assert_eq!(frame_path(Path::new("out/session"), 7), PathBuf::from("out/session.007.svg"));
    }

    #[test]
    fn replay_writes_a_frame_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, contents: String| {
            let path = dir.path().join(name);
            fs::write(&path, contents).unwrap();
            path
        };
        let mut mismatches = String::from("mismatches,positions,bases,number_of_sequences\n");
        for position in 0..=600 {
            mismatches.push_str(&format!("{},{},A,250\n", position % 4, position));
        }
        let header = "name,sequence,start_position,stop_position,primer_length,capture_length\n";
        let layout = Layout::default();
        let args = ReplayArgs {
            inputs: InputArgs {
                mismatches: write("mismatches.csv", mismatches),
                forwards: write("forwards.csv", format!("{}F1,ACGT,100,130,20,15\n", header)),
                reverses: write("reverses.csv", format!("{}R1,TTGA,400,430,20,15\n", header)),
            },
            selection: SelectionArgs {
                forward: None,
                reverse: None,
                view: ViewMode::Default,
            },
            script: write(
                "session.txt",
                "view Forward\nhover 100\nforward nope\nwait 1500\n".to_string(),
            ),
            output_prefix: dir.path().join("frames"),
            settle: false,
            style: StyleArgs {
                organism: "test".to_string(),
                font_family: None,
                width: layout.width,
                height: layout.height,
                duration: layout.duration,
            },
        };
        replay(args.clone()).unwrap();

        for index in 0..5 {
            assert!(frame_path(&args.output_prefix, index).exists(), "frame {}", index);
        }
        assert!(!frame_path(&args.output_prefix, 5).exists());
        let hovered = fs::read_to_string(frame_path(&args.output_prefix, 2)).unwrap();
        assert!(hovered.contains("Position: 100"));
        assert!(hovered.contains("Amplicon Length: 330"));
    }
}
