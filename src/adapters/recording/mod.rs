//! Recording adapters that capture downloads to cassettes.

pub mod downloader;
