use crate::error::Error;
use log::debug;
use std::time::{Duration, Instant};

/// A scheduled tick of the playback timer.
///
/// A handle is only honored while playback is still running in the epoch that
/// issued it. Stopping playback bumps the epoch, so every outstanding handle
/// becomes stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickHandle {
    epoch: u64,
    due: Instant,
}

impl TickHandle {
    /// When the tick should fire.
    pub fn due(&self) -> Instant {
        self.due
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running,
}

/// Paces repeated generations and measures the rate actually achieved.
///
/// The scheduler never calls back into anything by itself. `start` and every
/// accepted `tick` return the handle of the next tick, and the host loop fires
/// it when it is due.
#[derive(Clone, Debug)]
pub struct PlaybackScheduler {
    state: PlaybackState,
    epoch: u64,
    target_interval: Duration,
    last_tick: Option<Instant>,
    pending: Option<TickHandle>,
    observed_rate: f64,
}

impl Default for PlaybackScheduler {
    fn default() -> Self {
        PlaybackScheduler {
            state: PlaybackState::Idle,
            epoch: 0,
            target_interval: Duration::from_millis(1),
            last_tick: None,
            pending: None,
            observed_rate: 0.0,
        }
    }
}

/// `max(1, round(1000 / generations_per_second))` milliseconds.
pub fn target_interval(generations_per_second: f64) -> Result<Duration, Error> {
    if !generations_per_second.is_finite() || generations_per_second <= 0.0 {
        return Err(Error::InvalidRate(generations_per_second));
    }
    let millis = (1000.0 / generations_per_second).round().max(1.0);
    Ok(Duration::from_millis(millis as u64))
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn target_interval(&self) -> Duration {
        self.target_interval
    }

    /// Generations per second measured between the last two ticks.
    pub fn observed_rate(&self) -> f64 {
        self.observed_rate
    }

    /// The tick that is currently scheduled, if any.
    pub fn pending(&self) -> Option<TickHandle> {
        self.pending
    }

    /// Starts playback at `now`.
    ///
    /// If playback is already running, nothing changes and the pending tick is
    /// returned.
    pub fn start(&mut self, generations_per_second: f64, now: Instant) -> Result<TickHandle, Error> {
        let interval = target_interval(generations_per_second)?;
        if let (PlaybackState::Running, Some(pending)) = (self.state, self.pending) {
            return Ok(pending);
        }
        self.epoch += 1;
        self.state = PlaybackState::Running;
        self.target_interval = interval;
        self.last_tick = Some(now);
        debug!(
            "Playback started: epoch {}, interval {:?}",
            self.epoch, interval
        );
        Ok(self.schedule(now))
    }

    /// Stops playback. Every outstanding handle becomes stale.
    ///
    /// Returns whether playback was running.
    pub fn stop(&mut self) -> bool {
        self.pending = None;
        if self.state == PlaybackState::Idle {
            return false;
        }
        self.state = PlaybackState::Idle;
        self.epoch += 1;
        debug!("Playback stopped: epoch {}", self.epoch);
        true
    }

    /// Whether `handle` would be honored by [`begin_tick`](Self::begin_tick).
    pub fn is_live(&self, handle: TickHandle) -> bool {
        self.is_running() && self.pending == Some(handle)
    }

    /// Accepts a tick at `now` if `handle` is live, and updates the observed
    /// rate. The caller must then advance the grid and call
    /// [`finish_tick`](Self::finish_tick).
    pub(crate) fn begin_tick(&mut self, handle: TickHandle, now: Instant) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        self.pending = None;
        if let Some(last) = self.last_tick {
            let dt = now.saturating_duration_since(last).as_secs_f64();
            if dt > 0.0 {
                self.observed_rate = 1.0 / dt;
            }
        }
        self.last_tick = Some(now);
        true
    }

    /// Schedules the tick after the one accepted at `now`.
    pub(crate) fn finish_tick(&mut self, now: Instant) -> Option<TickHandle> {
        if self.is_running() {
            Some(self.schedule(now))
        } else {
            None
        }
    }

    fn schedule(&mut self, now: Instant) -> TickHandle {
        let handle = TickHandle {
            epoch: self.epoch,
            due: now + self.target_interval,
        };
        self.pending = Some(handle);
        handle
    }

    /// How long the host may wait before the pending tick is due.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|handle| handle.due.saturating_duration_since(now))
    }
}
