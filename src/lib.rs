//! Grid step-sequencer backed by a bank of resonant filters, one voice per
//! pitch. Placing a mark on the grid makes a decaying tone sound whenever the
//! playback cursor crosses that column.
//!
//! The crate provides:
//! - Engine state and command handling (grid edits, gain, transport)
//! - Two-pole resonator voices with history carried across blocks
//! - Block-wise mixing and 16-bit PCM encoding
//! - Audio sinks (CPAL device output, WAV bounce)

pub mod clock;
pub mod config;
pub mod engine;
pub mod filters;
pub mod platform;
pub mod utils;

#[cfg(feature = "bounce")]
pub mod bounce;

// Re-export commonly used types
pub use clock::TickClock;
pub use config::EngineConfig;
pub use engine::{encode_sample, Command, Engine, PatternGrid, PlaybackState, Transport};
pub use filters::Resonator;
pub use platform::AudioSink;

#[cfg(feature = "native")]
pub use platform::CpalSink;

#[cfg(feature = "bounce")]
pub use platform::WavSink;
