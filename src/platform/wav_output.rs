use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};

use super::AudioSink;

/// File sink for offline rendering: mono 16-bit WAV.
pub struct WavSink {
    writer: WavWriter<std::io::BufWriter<std::fs::File>>,
}

impl WavSink {
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("creating {}", path.display()))?;
        Ok(Self { writer })
    }

    /// Flush and close the file. Must be called for a well-formed header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("finalizing wav file")?;
        Ok(())
    }
}

impl AudioSink for WavSink {
    fn write(&mut self, block: &[i16]) -> Result<()> {
        for &sample in block {
            self.writer.write_sample(sample)?;
        }
        Ok(())
    }
}
