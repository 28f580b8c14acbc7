//! Bulk data downloads.

pub mod matrix;
