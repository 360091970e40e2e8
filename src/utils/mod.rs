pub mod ip;
pub mod user_agent;

pub use ip::{extract_client_ip_from_headers, is_private_or_local, is_valid_ip_literal};
pub use user_agent::{ClientKind, classify_user_agent};
