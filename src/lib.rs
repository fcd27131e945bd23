//! raptor-log - diagnostic logging for host-driven mods
//!
//! Writes per-group, per-day log files, retries writes that collide with
//! another writer, and shows short notices on the host's notification surface.

pub mod config;
pub mod fault;
pub mod host;
pub mod logging;
pub mod notify;
pub mod report;
