//! JSON API handlers.

pub mod catalog;
