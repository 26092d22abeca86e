//! Local supervisor for the MCP hub server.
//!
//! Installs the hub payload into a per-user directory, launches the hub as a
//! detached background process, corroborates liveness with an HTTP health
//! probe, and arbitrates which of several concurrent supervisor instances
//! owns start/stop decisions.

pub mod config;
pub mod error;
pub mod install;
pub mod owner;
pub mod prereq;
pub mod publish;
pub mod runner;
pub mod session;
pub mod supervise;
