use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, FromSample, SizedSample, Stream, StreamConfig,
};
use ringbuf::{
    traits::{Consumer, Producer, Split},
    HeapCons, HeapProd, HeapRb,
};

use super::AudioSink;

/// Blocks of headroom in the ring between the tick thread and the device
/// callback. Deep enough to ride out callback jitter, shallow enough that
/// control changes stay audible promptly.
const RING_BLOCKS: usize = 4;

/// Producer backoff while the ring is full.
const FULL_RING_BACKOFF: Duration = Duration::from_micros(500);

/// Live audio output through the default CPAL device.
///
/// Blocks are pushed into a lock-free ring buffer; the device callback
/// drains it one frame at a time, converting to whatever sample format the
/// device wants and copying each mono sample to every channel. `write`
/// blocks while the ring is full, which is what paces the tick loop to real
/// time. Dropping the sink stops the stream and releases the device.
pub struct CpalSink {
    producer: HeapProd<i16>,
    failed: Arc<AtomicBool>,
    sample_rate: u32,
    // Keeps the callback alive; playback stops when this drops
    _stream: Stream,
}

impl CpalSink {
    /// Open the default output device at the given sample rate.
    ///
    /// The device's native sample format is used as is; the rate is
    /// requested exactly, and hosts that cannot provide it fail here rather
    /// than play everything at the wrong pitch.
    pub fn open(sample_rate: u32, block_size: usize) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no default audio output device"))?;
        let supported = device
            .default_output_config()
            .context("querying default output config")?;

        log::info!(
            "audio output: {} ({:?}, {} channels, {} Hz)",
            device.name().unwrap_or_else(|_| "unknown".into()),
            supported.sample_format(),
            supported.channels(),
            sample_rate
        );

        let config = StreamConfig {
            channels: supported.channels(),
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let ring = HeapRb::<i16>::new(block_size * RING_BLOCKS);
        let (producer, consumer) = ring.split();
        let failed = Arc::new(AtomicBool::new(false));

        let stream = match supported.sample_format() {
            cpal::SampleFormat::I8 => {
                Self::make_stream::<i8>(&device, &config, consumer, failed.clone())
            }
            cpal::SampleFormat::I16 => {
                Self::make_stream::<i16>(&device, &config, consumer, failed.clone())
            }
            cpal::SampleFormat::I32 => {
                Self::make_stream::<i32>(&device, &config, consumer, failed.clone())
            }
            cpal::SampleFormat::I64 => {
                Self::make_stream::<i64>(&device, &config, consumer, failed.clone())
            }
            cpal::SampleFormat::U8 => {
                Self::make_stream::<u8>(&device, &config, consumer, failed.clone())
            }
            cpal::SampleFormat::U16 => {
                Self::make_stream::<u16>(&device, &config, consumer, failed.clone())
            }
            cpal::SampleFormat::U32 => {
                Self::make_stream::<u32>(&device, &config, consumer, failed.clone())
            }
            cpal::SampleFormat::U64 => {
                Self::make_stream::<u64>(&device, &config, consumer, failed.clone())
            }
            cpal::SampleFormat::F32 => {
                Self::make_stream::<f32>(&device, &config, consumer, failed.clone())
            }
            cpal::SampleFormat::F64 => {
                Self::make_stream::<f64>(&device, &config, consumer, failed.clone())
            }
            sample_format => Err(anyhow!("unsupported sample format '{sample_format}'")),
        }?;

        stream.play().context("starting audio stream")?;

        Ok(Self {
            producer,
            failed,
            sample_rate,
            _stream: stream,
        })
    }

    /// Build a typed stream for the device's sample format.
    fn make_stream<T>(
        device: &Device,
        config: &StreamConfig,
        mut consumer: HeapCons<i16>,
        failed: Arc<AtomicBool>,
    ) -> Result<Stream>
    where
        T: SizedSample + FromSample<i16>,
    {
        let channels = config.channels as usize;
        let err_fn = move |err| {
            log::error!("audio stream error: {err}");
            failed.store(true, Ordering::Release);
        };

        let stream = device
            .build_output_stream(
                config,
                move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
                    for frame in output.chunks_mut(channels) {
                        // Underruns play out as silence
                        let sample = consumer.try_pop().unwrap_or(0);
                        let value = T::from_sample(sample);
                        for out in frame.iter_mut() {
                            *out = value;
                        }
                    }
                },
                err_fn,
                None,
            )
            .context("building output stream")?;

        Ok(stream)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl AudioSink for CpalSink {
    fn write(&mut self, block: &[i16]) -> Result<()> {
        let mut written = 0;
        while written < block.len() {
            if self.failed.load(Ordering::Acquire) {
                bail!("audio stream failed");
            }
            written += self.producer.push_slice(&block[written..]);
            if written < block.len() {
                thread::sleep(FULL_RING_BACKOFF);
            }
        }
        Ok(())
    }
}
