pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod sync;
pub mod transport;

mod notifications_client;

pub use notifications_client::*;
