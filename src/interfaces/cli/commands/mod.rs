pub mod config_gen;
pub mod resolve;
pub mod route;
