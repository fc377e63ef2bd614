//! Command implementations.

pub mod ingest;
pub mod status;
