//! Launch records dashboard.
//!
//! The [`data`] module is the whole query layer: load a table of launches once,
//! then answer outcome-breakdown and payload-correlation queries against it.
//! The binary wraps it in an egui front end.

pub mod data;
