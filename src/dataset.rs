mod readers;
mod records;
mod store;

pub use readers::{load_dataset, read_mismatches, read_primers, DataSources};
pub use records::{MismatchRecord, PrimerRecord, Strand};
pub use store::DatasetStore;
