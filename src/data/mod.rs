//! Data module - CSV loading and row slicing

mod loader;
mod processor;

pub use loader::{read_csv, DataLoader, LoaderError};
pub use processor::{LandUseProcessor, LandUseShares, ProcessorError};
