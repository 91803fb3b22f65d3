mod fallback;
mod push_transport;
mod reconnect_backoff;

pub use fallback::*;
pub use push_transport::*;
pub use reconnect_backoff::*;
