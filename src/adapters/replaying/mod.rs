//! Replaying adapters that serve recorded downloads from cassettes.

pub mod downloader;
