use std::time::Duration;

/// Timing knobs of the client. [`Default`] values match the
/// behaviour expected by a browser-like host application.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How many notifications a single refresh pulls from the server.
    pub page_limit: u32,

    /// Poll interval while the host application is visible to the user.
    pub poll_interval_foreground: Duration,
    /// Poll interval while the host application is hidden.
    pub poll_interval_background: Duration,

    /// Refreshes requested more often than this are dropped
    /// unless they are forced.
    pub min_fetch_interval: Duration,
    /// Delay before the single retry of a failed refresh.
    pub fetch_retry_delay: Duration,

    /// Delay before the first websocket reconnect attempt.
    pub reconnect_initial_delay: Duration,
    /// Upper bound of the reconnect delay.
    pub reconnect_max_delay: Duration,
    /// Reconnect attempts before the transport gives up.
    pub reconnect_max_attempts: u32,

    /// Interval of application level ping probes sent over the websocket.
    pub ping_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            page_limit: 20,
            poll_interval_foreground: Duration::from_secs(30),
            poll_interval_background: Duration::from_secs(120),
            min_fetch_interval: Duration::from_secs(10),
            fetch_retry_delay: Duration::from_secs(5),
            reconnect_initial_delay: Duration::from_secs(1),
            reconnect_max_delay: Duration::from_secs(30),
            reconnect_max_attempts: 5,
            ping_interval: Duration::from_secs(30),
        }
    }
}
