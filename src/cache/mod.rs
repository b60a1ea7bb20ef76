//! Cache module - Manages timestamp-named generation directories
//!
//! Provides:
//! - Generation lookup, lazy creation and flushing
//! - Cache-busting URI construction

pub mod error;
pub mod generation;
pub mod uri;
