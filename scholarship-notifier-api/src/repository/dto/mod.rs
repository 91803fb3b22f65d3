mod notification;
mod notification_find_entity;

pub use notification::*;
pub use notification_find_entity::*;
