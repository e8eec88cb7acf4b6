//! Shared library modules for the basecred profile service.
//!
//! Re-exports modules needed by standalone binaries (e.g. `lookup`)
//! without duplicating code from the main binary.

pub mod aggregator;
pub mod client;
pub mod config;
pub mod profile;
pub mod server;
pub mod view;
