//! quizlens-core — Response tables, filtering, and per-question statistics.
//!
//! This crate defines the data model, spreadsheet loading, and the statistics
//! pass that the report renderer and the CLI build on.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod statistics;
