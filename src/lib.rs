//! promsd - caching client for Prometheus-style HTTP service discovery
//!
//! Resolves an identifier (typically a domain) into a list of discovery
//! records by querying a remote HTTP endpoint. Responses are kept in a
//! bounded in-memory cache and revalidated with conditional requests, so an
//! unchanged origin answers `304 Not Modified` without resending a body.

pub mod cache;
pub mod cli;
pub mod client;
pub mod data;

pub use client::{DiscoveryClient, DiscoveryError};
pub use data::Target;
