use std::time::Duration;

pub struct RealtimeServiceConfig {
    pub ping_interval: Duration,

    pub connection_buffer_size: usize,
}
