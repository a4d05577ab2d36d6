//! Core types shared across apidelta facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: RunId for tying together the events of one batch walk
//! - **Schema constants**: Canonical lifecycle event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
