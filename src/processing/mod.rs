//! Fix pre-processing

pub mod fix_filter;

pub use fix_filter::{FixDecision, FixFilter, FixFilterConfig};
