use crate::{
    config::Config,
    edit::EditSession,
    error::Error,
    evolve::GenerationEngine,
    grid::Grid,
    playback::{PlaybackScheduler, TickHandle},
};
use log::{debug, trace};
use rand::Rng;
use std::{
    fmt::{Debug, Formatter, Result as DebugResult},
    mem,
    time::{Duration, Instant},
};

type Observer = Box<dyn FnMut(&Grid, u64)>;

/// A running simulation: the grid, the interaction mode and the playback
/// timer.
///
/// All mutation goes through `&mut self`, so a tick and a command can never
/// interleave. Observers registered with [`subscribe`](Session::subscribe)
/// are called after every generation with the new grid and generation number.
pub struct Session {
    grid: Grid,
    back: Grid,
    engine: GenerationEngine,
    edit: EditSession,
    playback: PlaybackScheduler,
    generations_per_second: f64,
    generation: u64,
    observers: Vec<Observer>,
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> DebugResult {
        f.debug_struct("Session")
            .field("dimensions", &self.grid.dimensions())
            .field("generation", &self.generation)
            .field("edit", &self.edit)
            .field("playback", &self.playback)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::with_grid(Grid::default(), Config::default().generations_per_second)
    }
}

impl Session {
    /// Creates a session with an empty `width` × `height` grid.
    pub fn new(width: i64, height: i64) -> Result<Self, Error> {
        Config::new(width, height).session()
    }

    pub(crate) fn with_grid(grid: Grid, generations_per_second: f64) -> Self {
        Session {
            back: grid.clone(),
            grid,
            engine: GenerationEngine::new(),
            edit: EditSession::new(),
            playback: PlaybackScheduler::new(),
            generations_per_second,
            generation: 0,
            observers: Vec::new(),
        }
    }

    /// Creates a session from an existing grid.
    pub fn from_grid(grid: Grid) -> Self {
        Session::with_grid(grid, Config::default().generations_per_second)
    }

    /// A read-only view of the current generation.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn get_cell(&self, x: i64, y: i64) -> Result<u8, Error> {
        self.grid.get_cell(x, y)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    pub fn population(&self) -> u64 {
        self.grid.population()
    }

    /// Number of generations computed since the grid was last cleared or
    /// randomized.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit.is_edit_mode()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_running()
    }

    pub fn observed_rate(&self) -> f64 {
        self.playback.observed_rate()
    }

    pub fn target_interval(&self) -> Duration {
        self.playback.target_interval()
    }

    pub fn pending_tick(&self) -> Option<TickHandle> {
        self.playback.pending()
    }

    /// The rate used by [`toggle_playback`](Session::toggle_playback).
    pub fn generations_per_second(&self) -> f64 {
        self.generations_per_second
    }

    /// Registers a callback for every new generation.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&Grid, u64) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn set_cell(&mut self, x: i64, y: i64, value: u8) -> Result<(), Error> {
        self.grid.set_cell(x, y, value)?;
        Ok(())
    }

    /// Flips a cell and returns its new state.
    pub fn toggle_cell(&mut self, x: i64, y: i64) -> Result<u8, Error> {
        self.grid.toggle_cell(x, y)
    }

    pub fn randomize(&mut self) {
        self.grid.randomize();
        self.generation = 0;
    }

    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.grid.randomize_with(rng);
        self.generation = 0;
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.generation = 0;
    }

    fn advance(&mut self) {
        self.engine.advance_into(&self.grid, &mut self.back);
        mem::swap(&mut self.grid, &mut self.back);
        self.generation += 1;
        trace!(
            "Generation {}: population {}",
            self.generation,
            self.grid.population()
        );
        for observer in &mut self.observers {
            observer(&self.grid, self.generation);
        }
    }

    /// Advances one generation, unless in edit mode.
    ///
    /// Returns whether a generation was computed.
    pub fn step(&mut self) -> bool {
        if self.edit.is_edit_mode() {
            return false;
        }
        self.advance();
        true
    }

    /// Switches between edit mode and run mode. Ignored while playing.
    ///
    /// Returns whether the mode changed.
    pub fn toggle_edit_mode(&mut self) -> bool {
        let changed = self.edit.toggle_edit_mode(self.is_playing());
        if changed {
            debug!("Edit mode: {}", self.edit.is_edit_mode());
        }
        changed
    }

    /// What a primary click on cell `(x, y)` does: toggles the cell in edit
    /// mode, advances one generation otherwise. Ignored while playing.
    ///
    /// Returns whether anything changed.
    pub fn primary_click(&mut self, x: i64, y: i64) -> Result<bool, Error> {
        if self.is_playing() {
            return Ok(false);
        }
        if self.edit.is_edit_mode() {
            self.toggle_cell(x, y)?;
            Ok(true)
        } else {
            Ok(self.step())
        }
    }

    /// Starts playback at the given rate.
    ///
    /// Returns the first tick, or `None` in edit mode. If playback is already
    /// running, the pending tick is returned and the timing is kept.
    pub fn start_playback(&mut self, generations_per_second: f64) -> Result<Option<TickHandle>, Error> {
        self.start_playback_at(generations_per_second, Instant::now())
    }

    pub fn start_playback_at(
        &mut self,
        generations_per_second: f64,
        now: Instant,
    ) -> Result<Option<TickHandle>, Error> {
        if self.edit.is_edit_mode() {
            return Ok(None);
        }
        self.playback.start(generations_per_second, now).map(Some)
    }

    /// Stops playback. A pending tick will never fire.
    ///
    /// Returns whether playback was running.
    pub fn stop_playback(&mut self) -> bool {
        self.playback.stop()
    }

    /// Starts playback at the configured rate if stopped, stops it otherwise.
    ///
    /// Returns whether playback is now running.
    pub fn toggle_playback(&mut self) -> Result<bool, Error> {
        self.toggle_playback_at(Instant::now())
    }

    pub fn toggle_playback_at(&mut self, now: Instant) -> Result<bool, Error> {
        if self.is_playing() {
            self.stop_playback();
        } else {
            self.start_playback_at(self.generations_per_second, now)?;
        }
        Ok(self.is_playing())
    }

    /// Fires a scheduled tick.
    ///
    /// Stale handles are ignored. Otherwise the observed rate is updated, one
    /// generation is computed and the next tick is returned.
    pub fn tick(&mut self, handle: TickHandle) -> Option<TickHandle> {
        self.tick_at(handle, Instant::now())
    }

    pub fn tick_at(&mut self, handle: TickHandle, now: Instant) -> Option<TickHandle> {
        if !self.playback.begin_tick(handle, now) {
            trace!("Ignored stale tick from epoch {}", handle.epoch());
            return None;
        }
        self.advance();
        self.playback.finish_tick(now)
    }

    /// Fires the pending tick if it is due.
    ///
    /// Returns whether a generation was computed.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        match self.playback.pending() {
            Some(handle) if handle.due() <= now => self.tick_at(handle, now).is_some(),
            _ => false,
        }
    }

    /// How long the host loop may sleep before calling [`poll`](Session::poll).
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.playback.time_until_tick(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    fn blinker() -> Result<Session, Error> {
        let mut session = Session::new(5, 5)?;
        session.set_cell(1, 2, 1)?;
        session.set_cell(2, 2, 1)?;
        session.set_cell(3, 2, 1)?;
        Ok(session)
    }

    #[test]
    fn test_step() -> Result<(), Error> {
        let mut session = blinker()?;
        let start = session.grid().clone();
        assert!(session.step());
        assert_eq!(session.generation(), 1);
        assert_eq!(session.get_cell(2, 1)?, 1);
        assert_eq!(session.get_cell(1, 2)?, 0);
        assert!(session.step());
        assert_eq!(session.grid(), &start);
        assert_eq!(session.generation(), 2);
        Ok(())
    }

    #[test]
    fn test_step_in_edit_mode() -> Result<(), Error> {
        let mut session = blinker()?;
        let start = session.grid().clone();
        assert!(session.toggle_edit_mode());
        assert!(!session.step());
        assert_eq!(session.grid(), &start);
        assert_eq!(session.generation(), 0);
        Ok(())
    }

    #[test]
    fn test_primary_click() -> Result<(), Error> {
        let mut session = Session::new(6, 6)?;
        session.toggle_edit_mode();
        assert!(session.primary_click(2, 3)?);
        assert_eq!(session.get_cell(2, 3)?, 1);
        assert!(session.primary_click(2, 3)?);
        assert_eq!(session.get_cell(2, 3)?, 0);
        assert!(matches!(
            session.primary_click(6, 0),
            Err(Error::OutOfBounds { .. })
        ));

        session.toggle_cell(2, 3)?;
        session.toggle_edit_mode();
        assert!(session.primary_click(2, 3)?);
        assert_eq!(session.generation(), 1);
        assert!(session.grid().is_empty());
        Ok(())
    }

    #[test]
    fn test_clear_and_randomize() -> Result<(), Error> {
        let mut session = blinker()?;
        session.step();
        session.clear();
        assert!(session.grid().is_empty());
        assert_eq!(session.generation(), 0);
        session.randomize();
        assert_eq!(session.dimensions(), (5, 5));
        assert_eq!(session.generation(), 0);
        Ok(())
    }

    #[test]
    fn test_observers() -> Result<(), Error> {
        let mut session = blinker()?;
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        session.subscribe(move |grid, generation| {
            log.borrow_mut().push((generation, grid.population()));
        });
        session.step();
        session.toggle_edit_mode();
        session.step();
        session.toggle_edit_mode();
        session.step();
        assert_eq!(*seen.borrow(), vec![(1, 3), (2, 3)]);
        Ok(())
    }

    #[test]
    fn test_playback() -> Result<(), Error> {
        let now = Instant::now();
        let mut session = blinker()?;
        let start = session.grid().clone();
        let handle = session.start_playback_at(10.0, now)?.unwrap();
        assert!(session.is_playing());
        assert_eq!(session.target_interval(), Duration::from_millis(100));

        assert!(!session.poll_at(now + Duration::from_millis(50)));
        assert_eq!(session.generation(), 0);

        let t1 = now + Duration::from_millis(100);
        let next = session.tick_at(handle, t1).unwrap();
        assert_eq!(session.generation(), 1);
        assert!((session.observed_rate() - 10.0).abs() < 1e-9);
        assert_eq!(next.due(), t1 + Duration::from_millis(100));

        assert!(session.poll_at(t1 + Duration::from_millis(125)));
        assert_eq!(session.generation(), 2);
        assert_eq!(session.grid(), &start);
        assert!((session.observed_rate() - 8.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_stop_before_tick() -> Result<(), Error> {
        let now = Instant::now();
        let mut session = blinker()?;
        let start = session.grid().clone();
        let handle = session.start_playback_at(30.0, now)?.unwrap();
        assert!(session.stop_playback());
        assert!(!session.is_playing());
        assert_eq!(session.tick_at(handle, now + Duration::from_secs(1)), None);
        assert!(!session.poll_at(now + Duration::from_secs(1)));
        assert_eq!(session.grid(), &start);
        assert_eq!(session.generation(), 0);
        Ok(())
    }

    #[test]
    fn test_playback_gating() -> Result<(), Error> {
        let now = Instant::now();
        let mut session = blinker()?;
        session.toggle_edit_mode();
        assert_eq!(session.start_playback_at(10.0, now)?, None);
        assert!(!session.is_playing());

        session.toggle_edit_mode();
        session.start_playback_at(10.0, now)?;
        assert!(!session.toggle_edit_mode());
        assert!(!session.is_edit_mode());
        assert!(!session.primary_click(0, 0)?);
        assert!(matches!(
            session.start_playback_at(0.0, now),
            Err(Error::InvalidRate(_))
        ));
        Ok(())
    }

    #[test]
    fn test_toggle_playback() -> Result<(), Error> {
        let now = Instant::now();
        let mut session = Config::new(8, 8).set_generations_per_second(20.0).session()?;
        assert!(session.toggle_playback_at(now)?);
        assert_eq!(session.target_interval(), Duration::from_millis(50));
        assert!(!session.toggle_playback_at(now)?);
        assert_eq!(session.pending_tick(), None);
        Ok(())
    }

    #[test]
    fn test_step_while_playing() -> Result<(), Error> {
        let now = Instant::now();
        let mut session = blinker()?;
        let handle = session.start_playback_at(10.0, now)?;
        assert!(session.step());
        assert_eq!(session.generation(), 1);
        assert_eq!(session.get_cell(2, 1)?, 1);
        assert!(session.is_playing());
        assert_eq!(session.pending_tick(), handle);

        // The scheduled tick still fires on time.
        let handle = handle.unwrap();
        assert!(!session.poll_at(now + Duration::from_millis(99)));
        assert!(session.tick_at(handle, handle.due()).is_some());
        assert_eq!(session.generation(), 2);
        Ok(())
    }
}
