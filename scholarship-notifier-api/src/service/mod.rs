pub mod notifications_service;
pub mod realtime_service;
