pub mod plot;
pub mod replay;

use crate::cli::InputArgs;
use crate::dataset::{load_dataset, DataSources, DatasetStore};
use crate::utils::Result;

fn load_inputs(inputs: &InputArgs) -> Result<DatasetStore> {
    let sources = DataSources {
        mismatches: inputs.mismatches.clone(),
        forwards: inputs.forwards.clone(),
        reverses: inputs.reverses.clone(),
    };
    Ok(load_dataset(&sources)?)
}
