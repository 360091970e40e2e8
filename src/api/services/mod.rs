pub mod dispatch;
pub mod responses;
pub mod state;

pub use dispatch::DispatchService;
pub use state::AppState;
