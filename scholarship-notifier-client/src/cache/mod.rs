mod notifications_cache;

pub use notifications_cache::*;
