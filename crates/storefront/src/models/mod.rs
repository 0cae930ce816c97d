//! Per-visitor models kept outside the catalog.

pub mod session;
