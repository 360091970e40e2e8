//! HTTP layer: middleware and the catch-all dispatcher

pub mod middleware;
pub mod services;
