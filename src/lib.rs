//! A toroidal Game of Life engine.
//!
//! A [`Session`] owns a fixed-size [`Grid`] whose edges wrap around, and
//! advances it under Conway's rule (B3/S23), one generation at a time or
//! through a cooperative playback timer. Drawing and input handling are left
//! to the caller.
//!
//! # Example
//!
//! ```rust
//! use toruslife::{Error, Session};
//!
//! let mut session = Session::new(5, 5)?;
//! for x in 1..4 {
//!     session.set_cell(x, 2, 1)?;
//! }
//! session.step();
//! assert_eq!(session.get_cell(2, 1)?, 1);
//! assert_eq!(session.get_cell(1, 2)?, 0);
//! # Ok::<(), Error>(())
//! ```

#![allow(clippy::bool_assert_comparison)]

mod config;
mod edit;
mod error;
mod evolve;
mod grid;
mod iter;
mod playback;
mod rule;
mod session;

pub use config::{Config, DEFAULT_GENERATIONS_PER_SECOND};
pub use edit::EditSession;
pub use error::Error;
pub use evolve::GenerationEngine;
pub use grid::{Grid, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use playback::{target_interval, PlaybackScheduler, PlaybackState, TickHandle};
pub use session::Session;
