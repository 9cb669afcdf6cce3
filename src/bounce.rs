//! Offline render of the current pattern to a WAV file.

use std::path::Path;

use anyhow::Result;

use crate::engine::{Command, Engine};
use crate::platform::{AudioSink, WavSink};

/// Render one full pass over the grid, plus the decay tail, to a mono
/// 16-bit WAV at the engine's sample rate.
///
/// The render runs on a fresh voice bank seeded with the live engine's
/// pattern and gain, so tones already ringing in the live engine are
/// neither heard in the file nor disturbed by the render.
pub fn bounce_to_wav(engine: &Engine, path: &Path) -> Result<()> {
    let config = engine.config().clone();

    let mut offline = Engine::new(config.clone())?;
    offline.apply(Command::SetGain(engine.gain()));
    for (column, row) in engine.grid().iter() {
        offline.apply(Command::Pick { column, row });
    }
    offline.apply(Command::TogglePlayback);

    let mut sink = WavSink::create(path, config.sample_rate)?;
    for _ in 0..config.total_substeps() {
        let block = offline.tick();
        sink.write(block)?;
    }

    // Let the last notes ring out with no further triggers
    offline.apply(Command::TogglePlayback);
    let tail_ticks = (config.decay_time / config.tick_period.as_secs_f32()).ceil() as usize;
    for _ in 0..tail_ticks {
        let block = offline.tick();
        sink.write(block)?;
    }

    sink.finalize()
}
