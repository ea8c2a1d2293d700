//! Typed access to an external simulation process.
//!
//! The simulator reads one JSON command per line and answers with a fixed-size
//! little-endian frame. [`Simulation`] hides that framing so callers (and
//! tests) only deal with observations, rewards and episodes.

use thiserror::Error;

mod protocol;
mod replay;
mod transport;

pub use protocol::{Command, FrameLayout, Observation, StepResponse};
pub use replay::{Episode, EpisodeRecorder, RecordedStep, best_episode, run_episode};
pub use transport::PipeTransport;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    #[error("simulator i/o failed")]
    Io(#[from] std::io::Error),
    #[error("failed to encode command")]
    Encode(#[from] serde_json::Error),
    #[error("frame is {actual} bytes but the layout needs {expected}")]
    FrameSize { expected: usize, actual: usize },
    #[error("terminal flag must be 0 or 1, got {0}")]
    TerminalFlag(u8),
    #[error("layout {width}x{height}x{channels} does not fit in memory")]
    LayoutTooLarge {
        width: usize,
        height: usize,
        channels: usize,
    },
}

/// One simulated environment, driven a step at a time.
pub trait Simulation {
    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Observation, SimError>;

    fn step(&mut self, action: u32) -> Result<StepResponse, SimError>;

    /// The current frame, without advancing the simulation.
    fn render(&mut self) -> Result<Observation, SimError>;
}

impl<S: Simulation + ?Sized> Simulation for &mut S {
    fn reset(&mut self) -> Result<Observation, SimError> {
        (**self).reset()
    }

    fn step(&mut self, action: u32) -> Result<StepResponse, SimError> {
        (**self).step(action)
    }

    fn render(&mut self) -> Result<Observation, SimError> {
        (**self).render()
    }
}
