use std::f64::consts::PI;

/// Two-pole resonator voice
///
/// A single pitched voice: an impulse excites a second-order IIR filter whose
/// conjugate pole pair sits at the target frequency, producing a sine burst
/// that decays geometrically. Processing is block-wise with the last two
/// output samples carried between blocks, so a tone keeps ringing across
/// buffer boundaries for as long as the recurrence leaves anything audible.
///
/// Difference equation: `y[n] = b0*x[n] - a1*y[n-1] - a2*y[n-2]`, with
/// `a1 = -2*r*cos(w)`, `a2 = r^2`, `b0 = sin(w)` for pole radius `r` and
/// normalized frequency `w`. With `0 < r < 1` the filter is stable and needs
/// no clamping of its own; the encoder downstream still clips the mix.
pub struct Resonator {
    frequency: f32,

    // Coefficients, fixed after construction
    b0: f32,
    a1: f32,
    a2: f32,

    // Output history carried across blocks
    y1: f32, // y[n-1]
    y2: f32, // y[n-2]

    // Impulse queued for the start of the next block
    pending_impulse: Option<f32>,
}

/// Pole radius for a tone that decays to -40 dB (amplitude 0.01) over
/// `decay_time` seconds at `sample_rate` Hz.
///
/// For any positive sample rate and decay time the result is strictly inside
/// the unit circle.
pub fn pole_radius(sample_rate: f64, decay_time: f64) -> f64 {
    0.01_f64.powf(1.0 / (decay_time * sample_rate))
}

impl Resonator {
    /// Create a voice tuned to `frequency` Hz.
    ///
    /// Callers are expected to have validated the parameters (positive sample
    /// rate and decay time, frequency below Nyquist); see
    /// [`EngineConfig::validate`](crate::EngineConfig::validate).
    pub fn new(sample_rate: f32, decay_time: f32, frequency: f32) -> Self {
        let r = pole_radius(sample_rate as f64, decay_time as f64);
        let omega = 2.0 * PI * frequency as f64 / sample_rate as f64;

        Self {
            frequency,
            b0: omega.sin() as f32,
            a1: (-2.0 * r * omega.cos()) as f32,
            a2: (r * r) as f32,
            y1: 0.0,
            y2: 0.0,
            pending_impulse: None,
        }
    }

    /// Queue an impulse of the given amplitude for sample 0 of the next block.
    ///
    /// A second call before the block is processed replaces the amplitude;
    /// one voice never sounds two simultaneous notes.
    pub fn arm(&mut self, amplitude: f32) {
        self.pending_impulse = Some(amplitude);
    }

    /// Run the recurrence for one block, adding this voice's output into
    /// `mix`. The input is silence except for a queued impulse at index 0.
    pub fn process_block(&mut self, mix: &mut [f32]) {
        let impulse = self.pending_impulse.take().unwrap_or(0.0);
        let mut y1 = self.y1;
        let mut y2 = self.y2;

        for (i, slot) in mix.iter_mut().enumerate() {
            let x = if i == 0 { impulse } else { 0.0 };
            let y = self.b0 * x - self.a1 * y1 - self.a2 * y2;
            *slot += y;
            y2 = y1;
            y1 = y;
        }

        self.y1 = flush_denormal(y1);
        self.y2 = flush_denormal(y2);
    }

    /// The frequency this voice is tuned to, in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}

#[inline]
fn flush_denormal(value: f32) -> f32 {
    if value.abs() < 1e-15 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pole_radius_inside_unit_circle() {
        for (sample_rate, decay_time) in
            [(8_000.0, 0.2), (44_100.0, 0.001), (48_000.0, 10.0), (1.0, 1.0)]
        {
            let r = pole_radius(sample_rate, decay_time);
            assert!(
                r > 0.0 && r < 1.0,
                "r = {r} for Fs = {sample_rate}, Ta = {decay_time}"
            );
        }
    }

    #[test]
    fn quiescent_voice_stays_silent() {
        let mut voice = Resonator::new(8_000.0, 0.2, 440.0);
        let mut mix = vec![0.0; 64];
        voice.process_block(&mut mix);
        assert!(mix.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn impulse_response_follows_analytic_envelope() {
        let sample_rate = 8_000.0;
        let decay_time = 0.2;
        let frequency = 440.0;

        let mut voice = Resonator::new(sample_rate, decay_time, frequency);
        voice.arm(1.0);
        let mut mix = vec![0.0; 256];
        voice.process_block(&mut mix);

        // y[n] = sin((n+1)*w) * r^n for a unit impulse
        let r = pole_radius(sample_rate as f64, decay_time as f64);
        let omega = 2.0 * std::f64::consts::PI * frequency as f64 / sample_rate as f64;
        for (n, &actual) in mix.iter().enumerate() {
            let expected = (((n + 1) as f64 * omega).sin() * r.powi(n as i32)) as f32;
            assert!(
                (actual - expected).abs() < 1e-4,
                "sample {n}: got {actual}, expected {expected}"
            );
        }
    }

    #[test]
    fn tone_decays_to_configured_envelope() {
        let sample_rate = 8_000.0;
        let decay_time = 0.2;
        let mut voice = Resonator::new(sample_rate, decay_time, 440.0);
        voice.arm(1.0);

        // One block per 100 samples so the carried history does real work
        let mut early_peak = 0.0_f32;
        let mut late_peak = 0.0_f32;
        let mut mix = vec![0.0; 100];
        for block in 0..17 {
            mix.fill(0.0);
            voice.process_block(&mut mix);
            let peak = mix.iter().fold(0.0_f32, |acc, &s| acc.max(s.abs()));
            if block == 0 {
                early_peak = peak;
            }
            // Samples 1600..1700 sit just past the -40 dB point
            if block == 16 {
                late_peak = peak;
            }
        }

        assert!(early_peak > 0.5, "early peak {early_peak}");
        assert!(late_peak < 0.02, "late peak {late_peak}");
        assert!(late_peak > 0.0, "tail should still be ringing");
    }

    #[test]
    fn split_blocks_match_single_block() {
        let mut whole = Resonator::new(8_000.0, 0.2, 329.63);
        let mut split = Resonator::new(8_000.0, 0.2, 329.63);

        whole.arm(0.75);
        let mut expected = vec![0.0; 256];
        whole.process_block(&mut expected);

        split.arm(0.75);
        let mut first = vec![0.0; 128];
        let mut second = vec![0.0; 128];
        split.process_block(&mut first);
        split.process_block(&mut second);

        assert_eq!(&expected[..128], &first[..]);
        assert_eq!(&expected[128..], &second[..]);
    }

    #[test]
    fn rearming_replaces_pending_impulse() {
        let mut voice = Resonator::new(8_000.0, 0.2, 440.0);
        voice.arm(1.0);
        voice.arm(0.25);
        let mut mix = vec![0.0; 4];
        voice.process_block(&mut mix);
        assert!((mix[0] - voice.b0 * 0.25).abs() < 1e-6);
    }
}
