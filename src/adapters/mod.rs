//! Adapter implementations for port traits.
//!
//! - `live/`: Real HTTP downloads
//! - `recording/`: Record downloads to cassettes
//! - `replaying/`: Replay downloads from cassettes

pub mod live;
pub mod recording;
pub mod replaying;
