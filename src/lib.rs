//! podium: in-memory domain engine for training groups and live
//! presentations, with a JSON HTTP shell.

pub mod engine;
pub mod errors;
pub mod handlers;
