//! Attendance computation engine.
//!
//! This crate reconstructs work intervals from raw time-clock punches,
//! validates proposed punches against assigned schedules and geofenced
//! locations, and computes worked versus theoretical time, flagging
//! overtime and deficit. Persistence, HTTP routing and report rendering
//! are external collaborators: the engine consumes already-fetched punch
//! history, schedule definitions and location assignments, and returns
//! typed decisions, intervals and period summaries.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
