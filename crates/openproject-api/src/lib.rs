//! Client-side plumbing for the OpenProject REST API.
//!
//! This crate holds everything below the MCP surface: process
//! configuration, typed views over the upstream's HAL payloads, the
//! authenticated HTTP client with exhaustive pagination, and the
//! status-transition validation that gates mutating updates.
//!
//! The adapter is a stateless pass-through: entities are fetched, possibly
//! mutated, and dropped when the call that referenced them returns.
//! Nothing is cached or persisted, and lock versions are never tracked
//! across calls; the caller supplies the version it last observed.

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod payload;
pub mod workflow;

pub use client::OpenProjectClient;
pub use config::Config;
pub use error::{Error, Result};
