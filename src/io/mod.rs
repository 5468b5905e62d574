//! File output.

/// CSV export of generated records.
pub mod export;
