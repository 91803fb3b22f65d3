mod poll_scheduler;
mod refresh_coordinator;
mod subscriptions;
mod visibility;

pub use poll_scheduler::*;
pub use refresh_coordinator::*;
pub use subscriptions::*;
pub use visibility::*;
