//! Core types shared across stablex facilities
//!
//! This crate provides the canonical schema constants used by both the
//! error and logging facilities and by the comparator's diagnostics:
//!
//! - **Field keys**: names of structured logging fields
//! - **Event names**: start/end/end_error boundaries and comparator events
//! - **Check names**: the two regression checks

pub mod schema;
