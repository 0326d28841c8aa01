//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the compositor and an external
//! system. Implementations live in `src/adapters/`.

pub mod downloader;

pub use downloader::{DownloadFuture, DownloadProgress, Downloader, ProgressFn};
