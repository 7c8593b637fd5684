//! CLI command implementations.

pub mod csv;
pub mod images;
pub mod pdf;
