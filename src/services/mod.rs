//! Service layer
//!
//! Geolocation providers, edge metadata and the static asset proxy. Shared by the HTTP
//! dispatcher and the CLI.

pub mod assets;
pub mod edge;
pub mod geoip;
pub mod regions;

pub use assets::{AssetProxy, https_location};
pub use edge::{EdgeMetadata, EdgeProvider};
pub use geoip::{
    GeoLookup, GeoRecord, HttpFetch, ProviderKind, ProviderRegistry, ResolveError, UreqFetch,
};
