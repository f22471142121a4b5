//! Settings of a session.

use crate::{
    error::Error,
    grid::{Grid, DEFAULT_HEIGHT, DEFAULT_WIDTH},
    playback::target_interval,
    session::Session,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default playback rate, in generations per second.
pub const DEFAULT_GENERATIONS_PER_SECOND: f64 = 60.0;

/// Settings of a session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Width of the grid.
    pub width: i64,
    /// Height of the grid.
    pub height: i64,
    /// Playback rate used by `Session::toggle_playback`.
    pub generations_per_second: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            generations_per_second: DEFAULT_GENERATIONS_PER_SECOND,
        }
    }
}

impl Config {
    /// Sets up a new configuration with given size.
    pub fn new(width: i64, height: i64) -> Self {
        Config {
            width,
            height,
            ..Config::default()
        }
    }

    /// Sets the width.
    pub fn set_width(mut self, width: i64) -> Self {
        self.width = width;
        self
    }

    /// Sets the height.
    pub fn set_height(mut self, height: i64) -> Self {
        self.height = height;
        self
    }

    /// Sets the playback rate.
    pub fn set_generations_per_second(mut self, generations_per_second: f64) -> Self {
        self.generations_per_second = generations_per_second;
        self
    }

    /// Creates a new session with an empty grid from the configuration.
    /// Returns an error if the size or the rate is invalid.
    pub fn session(&self) -> Result<Session, Error> {
        let grid = Grid::new(self.width, self.height)?;
        target_interval(self.generations_per_second)?;
        Ok(Session::with_grid(grid, self.generations_per_second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() -> Result<(), Error> {
        let session = Config::default().session()?;
        assert_eq!(session.dimensions(), (50, 30));
        assert_eq!(session.generations_per_second(), 60.0);
        assert!(!session.is_playing());
        assert!(!session.is_edit_mode());
        Ok(())
    }

    #[test]
    fn test_builder() -> Result<(), Error> {
        let config = Config::default()
            .set_width(12)
            .set_height(7)
            .set_generations_per_second(5.0);
        assert_eq!(config, Config::new(12, 7).set_generations_per_second(5.0));
        let session = config.session()?;
        assert_eq!(session.dimensions(), (12, 7));
        Ok(())
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            Config::new(0, 7).session(),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            Config::default().set_generations_per_second(-3.0).session(),
            Err(Error::InvalidRate(_))
        ));
    }
}
