use chrono::Utc;
use std::thread;
use tracing::{debug, warn};

use crate::backoff::PollInterval;
use crate::presence::PresenceTracker;
use crate::recorder::{Recorder, SessionStore};
use crate::status::StatusAdapter;

/// The polling loop: poll, feed the tracker, record any transition, adjust
/// the interval, sleep. Presence state and the interval are owned here; no
/// other thread touches them.
pub struct Monitor<A: StatusAdapter, S: SessionStore> {
    adapter: A,
    recorder: Recorder<S>,
    tracker: PresenceTracker,
    interval: PollInterval,
}

impl<A: StatusAdapter, S: SessionStore> Monitor<A, S> {
    pub fn new(adapter: A, recorder: Recorder<S>) -> Self {
        Self {
            adapter,
            recorder,
            tracker: PresenceTracker::new(),
            interval: PollInterval::new(),
        }
    }

    /// Runs the poll cycle forever. The sleep is the unconditional loop
    /// epilogue, so transport and parse failures still wait out the interval.
    pub fn run(mut self) -> ! {
        loop {
            self.cycle();
            thread::sleep(self.interval.current());
        }
    }

    fn cycle(&mut self) {
        match self.adapter.poll() {
            Ok(online) => {
                let now = Utc::now();
                match self.tracker.observe(online, now) {
                    Some(transition) => {
                        self.recorder.record(&transition);
                        self.interval.reset();
                    }
                    None => {
                        debug!(online, "No presence change");
                        self.interval.relax();
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "Status poll failed");
                self.interval.relax();
            }
        }
    }
}
