//! # Timetable Client
//!
//! HTTP access to the external scheduling service, plus the environment
//! configuration shared by front ends.

/// Configuration loaded from the environment
pub mod config;
/// reqwest implementation of the scheduling service
pub mod http;

pub use config::ClientConfig;
pub use http::HttpSchedulingService;
