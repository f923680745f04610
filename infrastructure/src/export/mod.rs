//! Dataset artifact output

pub mod writer;

pub use writer::{ExportWriteError, write_dataset};
