//! Utility functions shared across the pipeline.

pub mod safe_cast;
