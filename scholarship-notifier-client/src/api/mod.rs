mod error;
mod notifications_api;
mod notifications_api_impl;

pub use error::*;
pub use notifications_api::*;
pub use notifications_api_impl::*;
