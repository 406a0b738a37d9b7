use std::{
    thread,
    time::{Duration, Instant},
};

/// Minimum spacing between track queries required by freedb mirrors.
pub const TRACK_QUERY_INTERVAL: Duration = Duration::from_secs(1);

/// Keeps a minimum pause between the end of one query and the start of the
/// next.
///
/// Call [`Throttle::wait`] before a query and [`Throttle::mark`] once it has
/// finished. A `wait` with no earlier `mark` returns immediately.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    finished: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            finished: None,
        }
    }

    pub fn wait(&mut self) {
        if let Some(finished) = self.finished {
            let elapsed = finished.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
    }

    /// Records that the previous query has completed.
    pub fn mark(&mut self) {
        self.finished = Some(Instant::now());
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(TRACK_QUERY_INTERVAL)
    }
}
