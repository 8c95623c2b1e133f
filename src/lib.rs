pub mod api;
pub mod cache;
pub mod config;
pub mod cookies;
pub mod error;
pub mod models;
pub mod navigation;
pub mod services;
pub mod session;
pub mod state;

pub use error::ClientError;
pub use state::ClientState;
