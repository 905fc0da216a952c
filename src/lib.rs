//! Static structural-quality metrics for R source code.
//!
//! The analysis is lexical: functions, classes and control flow are
//! recognized with quote-aware scanning and pattern tables rather than a
//! full R parser, so malformed source degrades gracefully instead of
//! failing a run.

pub mod analysis_utils;
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;

pub use analyzers::RAnalyzer;
pub use core::{
    FileMetrics, FunctionComplexity, Paradigm, RepositoryMetrics, SingleFileReport,
};
pub use errors::RqualError;
pub use io::output::{create_writer, OutputFormat, OutputWriter};
