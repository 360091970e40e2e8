//! Request routing
//!
//! Maps a request path (and, for `/`, the User-Agent) to exactly one `RouteDecision`.
//! Pure function of request metadata; no I/O.

mod decision;
mod table;

pub use decision::RouteDecision;
pub use table::{PAGE_PATHS, RouteTable};
