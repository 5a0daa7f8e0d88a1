//! I/O boundary: capability traits and their production implementations.

pub mod real;
pub mod traits;

pub use real::{RealFileSystem, XccovExporter};
pub use traits::{CoverageExporter, ExportFailure, FileSystem};
