use super::load_inputs;
use crate::cli::PlotArgs;
use crate::mmvz::{chrome::Legend, interaction::Session, view_state::ViewState};
use crate::utils::Result;
use pipeplot::{render_to_file, Backend, Canvas};

pub fn plot(args: PlotArgs) -> Result<()> {
    let store = load_inputs(&args.inputs)?;
    let state = args.selection.apply(ViewState::initial(&store));
    let layout = args.style.layout();

    let mut canvas = Canvas::new(layout.width, layout.height);
    if let Some(font_family) = &args.style.font_family {
        canvas.set_font_family(font_family);
    }
    let legend = Legend::new(&args.style.organism, &store);
    let mut session = Session::with_state(&store, state, layout, legend, canvas);

    let report = session.render()?;
    session.backend_mut().finish_transitions();
    log::info!(
        "Rendered {} bars in {} view, amplicon length {}",
        report.bars.entered,
        session.state().mode,
        report.amplicon_length
    );

    render_to_file(session.backend(), &args.output_path)?;
    log::info!("Wrote {}", args.output_path.display());
    Ok(())
}
