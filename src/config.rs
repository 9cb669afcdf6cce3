//! Session configuration: audio format, voice tuning, and grid geometry.
//! All values are fixed for the lifetime of an [`Engine`](crate::Engine).

use std::time::Duration;

use anyhow::{bail, Result};

/// Startup configuration for the engine.
///
/// `frequencies` is ordered low to high and defines the row-to-pitch mapping:
/// row 0 is the top of the grid and sounds the last (highest) entry, the
/// bottom row sounds the first (lowest) entry. The list length must match
/// `rows` so every row has a voice.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Time for a triggered tone to decay to -40 dB, in seconds.
    pub decay_time: f32,
    /// Voice frequencies in Hz, ascending, one per grid row.
    pub frequencies: Vec<f32>,
    /// Samples synthesized and written to the sink per tick.
    pub block_size: usize,
    /// Nominal period of the update tick.
    pub tick_period: Duration,
    /// Grid width in cells (time steps).
    pub columns: usize,
    /// Grid height in cells (pitches).
    pub rows: usize,
    /// Cursor sub-steps per cell; the cursor advances one sub-step per tick.
    pub substeps_per_cell: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 8_000,
            decay_time: 0.2,
            // C major scale, C4 through B4
            frequencies: vec![261.63, 293.66, 329.63, 349.23, 392.0, 440.0, 493.88],
            block_size: 512,
            tick_period: Duration::from_millis(25),
            columns: 9,
            rows: 7,
            substeps_per_cell: 5,
        }
    }
}

impl EngineConfig {
    /// Check the configuration before any voice is constructed.
    ///
    /// A non-positive sample rate or decay time would put the filter pole
    /// outside the unit circle, and a frequency at or above Nyquist cannot be
    /// represented; all of these refuse to start rather than synthesize an
    /// unstable voice bank.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            bail!("sample rate must be positive");
        }
        if !(self.decay_time > 0.0) || !self.decay_time.is_finite() {
            bail!("decay time must be a positive number of seconds");
        }
        if self.frequencies.is_empty() {
            bail!("at least one voice frequency is required");
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        for &frequency in &self.frequencies {
            if !(frequency > 0.0) || frequency >= nyquist {
                bail!(
                    "voice frequency {frequency} Hz is outside (0, {nyquist}) at {} Hz",
                    self.sample_rate
                );
            }
        }
        if self.rows != self.frequencies.len() {
            bail!(
                "{} grid rows but {} voice frequencies; every row needs a voice",
                self.rows,
                self.frequencies.len()
            );
        }
        if self.columns == 0 {
            bail!("grid must have at least one column");
        }
        if self.block_size == 0 {
            bail!("block size must be positive");
        }
        if self.tick_period.is_zero() {
            bail!("tick period must be positive");
        }
        if self.substeps_per_cell < 2 {
            // The trigger point sits one sub-step inside each cell, so a cell
            // must be at least two sub-steps wide.
            bail!("cells must span at least two cursor sub-steps");
        }
        Ok(())
    }

    /// Total cursor travel for one pass over the grid, in sub-steps.
    pub fn total_substeps(&self) -> usize {
        self.columns * self.substeps_per_cell
    }
}
