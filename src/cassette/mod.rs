//! Record/replay of downloads for deterministic runs without network access.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
