mod notification;
mod notification_list;

pub use notification::*;
pub use notification_list::*;
