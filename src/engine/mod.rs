//! The sequencer engine: owns the voice bank, pattern grid, transport, and
//! gain, applies control commands, and renders one encoded PCM block per
//! tick. All state lives here and is only touched from the tick thread;
//! front-ends talk to it through [`Command`] values and read-only accessors.

pub mod grid;
pub mod transport;

pub use grid::PatternGrid;
pub use transport::{PlaybackState, Transport};

use anyhow::Result;

use crate::config::EngineConfig;
use crate::filters::Resonator;

/// Gain level restored by `Command::Reset`.
const DEFAULT_GAIN: i32 = 50;

/// Full-scale amplitude for a 16-bit trigger impulse.
const I16_PEAK: f32 = 32_767.0;

/// Control events from the front-end, applied between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A grid cell pick, already resolved to integer coordinates.
    /// Out-of-range coordinates are ignored.
    Pick { column: usize, row: usize },
    /// Gain control position, 0-100. Out-of-range values are clamped.
    SetGain(i32),
    /// Flip between playing and stopped.
    TogglePlayback,
    /// Clear the pattern, rewind the cursor, restore the default gain.
    /// Voices are left alone so ringing tails finish decaying naturally.
    Reset,
}

/// The single owner of all sequencer state.
pub struct Engine {
    config: EngineConfig,
    voices: Vec<Resonator>,
    grid: PatternGrid,
    transport: Transport,
    gain: i32,

    // Reused every tick; the render path does not allocate
    mix: Vec<f32>,
    block: Vec<i16>,
}

impl Engine {
    /// Build an engine from a validated configuration.
    ///
    /// Fails on a configuration that would produce an unstable voice bank;
    /// no voice is constructed in that case.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let voices = config
            .frequencies
            .iter()
            .map(|&frequency| {
                Resonator::new(config.sample_rate as f32, config.decay_time, frequency)
            })
            .collect();

        Ok(Self {
            grid: PatternGrid::new(),
            transport: Transport::new(config.columns, config.substeps_per_cell),
            gain: DEFAULT_GAIN,
            mix: vec![0.0; config.block_size],
            block: vec![0; config.block_size],
            voices,
            config,
        })
    }

    /// Apply one control command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Pick { column, row } => {
                if column < self.config.columns && row < self.config.rows {
                    self.grid.edit(column, row);
                }
            }
            Command::SetGain(level) => self.gain = level.clamp(0, 100),
            Command::TogglePlayback => self.transport.toggle(),
            Command::Reset => {
                self.grid.clear();
                self.transport.reset();
                self.gain = DEFAULT_GAIN;
            }
        }
    }

    /// Run one tick: advance the cursor, arm a voice if its column's trigger
    /// point was crossed, synthesize and mix one block from every voice, and
    /// encode it. Synthesis runs even while stopped so ringing tails keep
    /// decaying; stopped playback only suppresses cursor motion and triggers.
    pub fn tick(&mut self) -> &[i16] {
        self.transport.advance();
        if let Some(column) = self.transport.trigger_column() {
            if let Some(row) = self.grid.lookup(column) {
                // Row 0 is the top of the grid and the highest pitch
                let voice = self.config.rows - 1 - row;
                let amplitude = self.gain as f32 / 100.0 * I16_PEAK;
                self.voices[voice].arm(amplitude);
            }
        }

        self.mix.fill(0.0);
        for voice in &mut self.voices {
            voice.process_block(&mut self.mix);
        }

        for (out, &sample) in self.block.iter_mut().zip(&self.mix) {
            *out = encode_sample(sample);
        }
        &self.block
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &PatternGrid {
        &self.grid
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn gain(&self) -> i32 {
        self.gain
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }
}

/// Convert one mixed sample to a 16-bit PCM value: round to nearest, then
/// clip to the representable range so loud mixes distort instead of wrapping.
pub fn encode_sample(sample: f32) -> i16 {
    sample.round().clamp(-32_768.0, 32_767.0) as i16
}
