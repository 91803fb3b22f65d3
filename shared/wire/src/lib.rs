//!
//! Types shared by the notifier api and its clients.
//!
//! Everything in this crate crosses a process boundary, so the
//! serialized shape of these types is part of the public contract.
//!

mod event;
mod notification;
mod notification_list;

pub use event::*;
pub use notification::*;
pub use notification_list::*;
