mod notification;
mod notification_filters;
mod pagination;
mod websocket_token;

pub use notification::*;
pub use notification_filters::*;
pub use pagination::*;
pub use websocket_token::*;
