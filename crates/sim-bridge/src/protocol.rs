use std::io::Write;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use derive_more::Deref;
use serde::{Deserialize, Serialize};

use crate::SimError;

/// A request to the simulator, sent as a single JSON line.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Step { action: u32 },
    Reset,
    Render,
}

/// Shape of the frames the simulator answers with.
///
/// A step frame is `width * height * channels` image bytes, `features` `f32`s,
/// an `f32` reward and a terminal byte. Reset and render frames are the image
/// bytes alone.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FrameLayout {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub features: usize,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            channels: 3,
            features: 0,
        }
    }
}

impl FrameLayout {
    const SCALAR: usize = size_of::<f32>();

    fn too_large(&self) -> SimError {
        SimError::LayoutTooLarge {
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    pub fn image_len(&self) -> Result<usize, SimError> {
        self.width
            .checked_mul(self.height)
            .and_then(|len| len.checked_mul(self.channels))
            .ok_or_else(|| self.too_large())
    }

    pub fn step_len(&self) -> Result<usize, SimError> {
        self.features
            .checked_add(1)
            .and_then(|scalars| scalars.checked_mul(Self::SCALAR))
            .and_then(|scalars| scalars.checked_add(1))
            .and_then(|tail| tail.checked_add(self.image_len().ok()?))
            .ok_or_else(|| self.too_large())
    }
}

fn check_len(expected: usize, frame: &[u8]) -> Result<(), SimError> {
    if frame.len() == expected {
        Ok(())
    } else {
        Err(SimError::FrameSize {
            expected,
            actual: frame.len(),
        })
    }
}

/// Raw image bytes, row-major with interleaved channels.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct Observation {
    #[deref]
    pixels: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
}

impl Observation {
    /// Wraps `pixels`, which must hold exactly one image of `layout`.
    pub fn new(layout: &FrameLayout, pixels: Vec<u8>) -> Result<Self, SimError> {
        check_len(layout.image_len()?, &pixels)?;

        Ok(Self {
            pixels,
            width: layout.width,
            height: layout.height,
            channels: layout.channels,
        })
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// The channels of the pixel at `(x, y)`, `(0, 0)` being the top left.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let start = (y * self.width + x) * self.channels;
        self.pixels.get(start..start + self.channels)
    }

    #[must_use]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// The simulator's answer to [`Command::Step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepResponse {
    pub observation: Observation,
    pub features: Vec<f32>,
    pub reward: f32,
    pub terminal: bool,
}

impl StepResponse {
    pub fn decode(layout: &FrameLayout, frame: &[u8]) -> Result<Self, SimError> {
        check_len(layout.step_len()?, frame)?;

        let (image, mut r) = frame.split_at(layout.image_len()?);
        let observation = Observation::new(layout, image.to_vec())?;

        let features = (0..layout.features)
            .map(|_| r.read_f32::<LittleEndian>())
            .collect::<Result<Vec<_>, _>>()?;

        let reward = r.read_f32::<LittleEndian>()?;

        let terminal = match r.read_u8()? {
            0 => false,
            1 => true,
            flag => return Err(SimError::TerminalFlag(flag)),
        };

        Ok(Self {
            observation,
            features,
            reward,
            terminal,
        })
    }

    /// Writes the frame [`StepResponse::decode`] reads.
    pub fn encode(&self, w: &mut impl Write) -> std::io::Result<()> {
        w.write_all(&self.observation)?;
        for &feature in &self.features {
            w.write_f32::<LittleEndian>(feature)?;
        }
        w.write_f32::<LittleEndian>(self.reward)?;
        w.write_u8(u8::from(self.terminal))
    }
}
