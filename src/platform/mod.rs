//! Audio sink abstraction: where encoded PCM blocks go.
//!
//! The engine produces fixed-size mono 16-bit blocks and does not care what
//! consumes them; a sink may be a live output device or a file.

use anyhow::Result;

/// Destination for encoded PCM blocks.
pub trait AudioSink {
    /// Deliver one mono 16-bit block at the configured sample rate.
    ///
    /// May block until the sink can accept the whole block; for a live
    /// device that is the backpressure which paces the tick loop. An error
    /// means the sink is unusable and the caller should stop ticking.
    fn write(&mut self, block: &[i16]) -> Result<()>;
}

#[cfg(feature = "native")]
pub mod cpal_output;

#[cfg(feature = "native")]
pub use self::cpal_output::CpalSink;

#[cfg(feature = "bounce")]
pub mod wav_output;

#[cfg(feature = "bounce")]
pub use self::wav_output::WavSink;
