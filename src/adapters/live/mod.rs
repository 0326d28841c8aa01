//! Live adapters talking to real external systems.

pub mod http;
