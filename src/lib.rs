pub mod cli;
pub mod commands;
pub mod dataset;
pub mod error;
pub mod mmvz;
pub mod utils;
