//! Data models for the PowCollective API
//!
//! This module contains the core domain models organized by concern:
//! - Resort: static directory entries for ski resorts
//! - Conditions: derived conditions snapshot served to the browser client

pub mod conditions;
pub mod resort;

// Re-export all public types for convenient access
pub use conditions::{ClusterBucket, ConditionsSnapshot, Severity};
pub use resort::{ResortBrand, ResortSize, ResortSummary};
