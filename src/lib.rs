//! geoip-router - an edge HTTP router for IP geolocation
//!
//! Answers "what is my IP" for scripts, serves a small front-end through an asset
//! proxy, and resolves the caller's or a queried address through several upstream
//! geolocation providers into one normalized JSON record.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: One-shot command-line tools
//!
//! # Architecture
//! - `router`: ordered route table mapping a path to one `RouteDecision`
//! - `services`: provider adapters, edge metadata, asset proxy
//! - `api`: HTTP dispatcher, response envelopes and middleware
//! - `interfaces`: command-line interface
//! - `config`: configuration management
//! - `runtime`: server lifecycle
//! - `system`: logging and panic handling

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod router;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
