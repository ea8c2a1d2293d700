use std::io::{BufRead, Write};

use tracing::{debug, instrument, trace};

use crate::{
    SimError, Simulation,
    protocol::{Command, FrameLayout, Observation, StepResponse},
};

/// Talks to a simulator over a pair of byte streams, usually a child
/// process's stdout and stdin.
#[derive(Debug)]
pub struct PipeTransport<R, W> {
    reader: R,
    writer: W,
    layout: FrameLayout,
    frame: Vec<u8>,
}

impl<R: BufRead, W: Write> PipeTransport<R, W> {
    pub const fn new(reader: R, writer: W, layout: FrameLayout) -> Self {
        Self {
            reader,
            writer,
            layout,
            frame: Vec::new(),
        }
    }

    /// Like [`PipeTransport::new`], first discarding `lines` lines the
    /// simulator prints while starting up.
    #[instrument(skip(reader, writer))]
    pub fn with_preamble(
        mut reader: R,
        writer: W,
        layout: FrameLayout,
        lines: usize,
    ) -> Result<Self, SimError> {
        let mut line = String::new();

        for _ in 0..lines {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
            }
            debug!(line = line.trim_end(), "skipped simulator preamble");
        }

        Ok(Self::new(reader, writer, layout))
    }

    #[must_use]
    pub const fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    #[must_use]
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn send(&mut self, command: Command) -> Result<(), SimError> {
        trace!(?command, "sending");

        serde_json::to_writer(&mut self.writer, &command)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        Ok(())
    }

    fn read_frame(&mut self, len: usize) -> Result<&[u8], SimError> {
        self.frame.resize(len, 0);
        self.reader.read_exact(&mut self.frame)?;
        Ok(&self.frame)
    }

    fn observe(&mut self, command: Command) -> Result<Observation, SimError> {
        self.send(command)?;

        let len = self.layout.image_len()?;
        let layout = self.layout;
        let frame = self.read_frame(len)?;

        Observation::new(&layout, frame.to_vec())
    }
}

impl<R: BufRead, W: Write> Simulation for PipeTransport<R, W> {
    fn reset(&mut self) -> Result<Observation, SimError> {
        self.observe(Command::Reset)
    }

    fn step(&mut self, action: u32) -> Result<StepResponse, SimError> {
        self.send(Command::Step { action })?;

        let len = self.layout.step_len()?;
        let layout = self.layout;
        let frame = self.read_frame(len)?;

        StepResponse::decode(&layout, frame)
    }

    fn render(&mut self) -> Result<Observation, SimError> {
        self.observe(Command::Render)
    }
}
