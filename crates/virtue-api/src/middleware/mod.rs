//! Tower middleware for the API service.

pub mod metrics;
