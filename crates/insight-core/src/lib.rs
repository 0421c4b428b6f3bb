//! Insight Core - Domain logic for Insight Manager
//!
//! This crate provides:
//! - The lookup table over master options
//! - Insight and master option validation
//! - The CSV transcoder
//! - Insight, master option and CSV import services

pub mod lookup;
pub mod service;
pub mod transcoder;
pub mod validation;

pub use lookup::{LookupTable, MasterCategory};
pub use service::import::{ErrorDetail, ImportPolicy, ImportSummary};
pub use transcoder::TranscodeError;
