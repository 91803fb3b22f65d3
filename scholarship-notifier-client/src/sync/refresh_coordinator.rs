use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

///
/// Admission control for refreshes.
///
/// At most one fetch runs at a time and unforced fetches are dropped
/// when the previous one started less than `min_interval` ago. Forced
/// fetches skip the interval check but still wait out an in flight one.
///
pub struct RefreshCoordinator {
    min_interval: Duration,
    state: Mutex<RefreshState>,
}

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    last_started: Option<Instant>,
}

impl RefreshCoordinator {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            state: Mutex::new(RefreshState::default()),
        }
    }

    ///
    /// Try to start a refresh. Returns whether the caller won the slot.
    /// A successful call must be paired with [`Self::finish`].
    ///
    pub fn begin(&self, force: bool) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.in_flight {
            return false;
        }
        if !force {
            if let Some(last_started) = state.last_started {
                if last_started.elapsed() < self.min_interval {
                    return false;
                }
            }
        }

        state.in_flight = true;
        state.last_started = Some(Instant::now());
        true
    }

    pub fn finish(&self) {
        let mut state = self.state.lock().unwrap();
        state.in_flight = false;
    }
}
