// Integration tests for the sequencer engine core

use tonegrid::{encode_sample, Command, Engine, EngineConfig, Resonator};

fn engine() -> Engine {
    Engine::new(EngineConfig::default()).expect("default config should build")
}

#[test]
fn new_engine_is_stopped_and_silent() {
    let mut engine = engine();
    assert!(!engine.is_playing());

    let block = engine.tick();
    assert_eq!(block.len(), 512);
    assert!(block.iter().all(|&s| s == 0), "quiet voices must mix to silence");
}

#[test]
fn mark_fires_its_voice_at_the_column_trigger_point() {
    let mut engine = engine();

    // Row 0 is the top row, voiced by the highest configured frequency
    engine.apply(Command::Pick { column: 2, row: 0 });
    engine.apply(Command::TogglePlayback);

    // Ticks 1-10: the cursor crosses columns 0 and 1 and the first
    // sub-steps of column 2; nothing is placed there, so silence
    for tick in 1..=10 {
        let block = engine.tick();
        assert!(
            block.iter().all(|&s| s == 0),
            "unexpected audio on tick {tick}"
        );
    }

    // Tick 11: one sub-step past column 2's left edge. The block must be
    // exactly the solo impulse response of the highest voice at half gain,
    // which also proves no other voice was excited.
    let block = engine.tick().to_vec();

    let mut reference = Resonator::new(8_000.0, 0.2, 493.88);
    reference.arm(0.5 * 32_767.0);
    let mut mix = vec![0.0; 512];
    reference.process_block(&mut mix);
    let expected: Vec<i16> = mix.iter().map(|&s| encode_sample(s)).collect();

    assert!(block.iter().any(|&s| s != 0), "triggered voice must sound");
    assert_eq!(block, expected);
}

#[test]
fn bottom_row_sounds_the_lowest_voice() {
    let mut engine = engine();
    engine.apply(Command::Pick { column: 0, row: 6 });
    engine.apply(Command::TogglePlayback);

    let block = engine.tick().to_vec();

    let mut reference = Resonator::new(8_000.0, 0.2, 261.63);
    reference.arm(0.5 * 32_767.0);
    let mut mix = vec![0.0; 512];
    reference.process_block(&mut mix);
    let expected: Vec<i16> = mix.iter().map(|&s| encode_sample(s)).collect();

    assert_eq!(block, expected);
}

#[test]
fn gain_scales_the_trigger_impulse() {
    let mut loud = engine();
    loud.apply(Command::SetGain(100));
    loud.apply(Command::Pick { column: 0, row: 3 });
    loud.apply(Command::TogglePlayback);
    let loud_block = loud.tick().to_vec();

    let mut soft = engine();
    soft.apply(Command::SetGain(25));
    soft.apply(Command::Pick { column: 0, row: 3 });
    soft.apply(Command::TogglePlayback);
    let soft_block = soft.tick().to_vec();

    let loud_peak = loud_block.iter().map(|s| s.unsigned_abs()).max().unwrap();
    let soft_peak = soft_block.iter().map(|s| s.unsigned_abs()).max().unwrap();
    assert!(loud_peak > 3 * soft_peak, "peaks {loud_peak} vs {soft_peak}");
}

#[test]
fn zero_gain_triggers_are_inaudible() {
    let mut engine = engine();
    engine.apply(Command::SetGain(0));
    engine.apply(Command::Pick { column: 0, row: 0 });
    engine.apply(Command::TogglePlayback);

    for _ in 0..10 {
        let block = engine.tick();
        assert!(block.iter().all(|&s| s == 0));
    }
}

#[test]
fn reset_clears_pattern_but_lets_tails_ring() {
    let mut engine = engine();
    engine.apply(Command::Pick { column: 0, row: 2 });
    engine.apply(Command::TogglePlayback);

    let block = engine.tick();
    assert!(block.iter().any(|&s| s != 0), "voice should be ringing");

    engine.apply(Command::Reset);
    assert!(engine.grid().is_empty());
    assert_eq!(engine.transport().position(), 0);
    assert_eq!(engine.gain(), 50);

    // The cleared grid re-triggers nothing, but the tail keeps decaying
    let tail = engine.tick();
    assert!(tail.iter().any(|&s| s != 0), "decay tail must survive reset");
}

#[test]
fn pausing_freezes_the_cursor_but_not_the_tail() {
    let mut engine = engine();
    engine.apply(Command::Pick { column: 0, row: 0 });
    engine.apply(Command::TogglePlayback);
    engine.tick();
    let position = engine.transport().position();

    engine.apply(Command::TogglePlayback);
    let tail = engine.tick().to_vec();
    assert_eq!(engine.transport().position(), position);
    assert!(
        tail.iter().any(|&s| s != 0),
        "pause must not freeze a decaying tone"
    );
}

#[test]
fn full_pass_triggers_each_marked_column_once() {
    let mut engine = engine();
    engine.apply(Command::Pick { column: 0, row: 1 });
    engine.apply(Command::Pick { column: 4, row: 5 });
    engine.apply(Command::Pick { column: 8, row: 3 });
    engine.apply(Command::TogglePlayback);

    let total = engine.config().total_substeps();
    let mut audible_onsets = 0;
    let mut was_quiet = true;
    for _ in 0..total {
        let block = engine.tick();
        let peak = block.iter().map(|s| s.unsigned_abs()).max().unwrap();
        // A fresh trigger jumps well above the tail it lands on
        if peak > 8_000 && was_quiet {
            audible_onsets += 1;
            was_quiet = false;
        } else if peak < 4_000 {
            was_quiet = true;
        }
    }
    assert_eq!(audible_onsets, 3);
}

#[cfg(feature = "bounce")]
#[test]
fn bounce_writes_a_mono_16bit_wav() {
    let path = std::env::temp_dir().join("tonegrid_bounce_test.wav");

    let mut engine = engine();
    engine.apply(Command::Pick { column: 1, row: 4 });
    tonegrid::bounce::bounce_to_wav(&engine, &path).expect("bounce should succeed");

    let reader = hound::WavReader::open(&path).expect("bounce output should be a wav file");
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 8_000);
    assert_eq!(spec.bits_per_sample, 16);

    let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
    let config = engine.config();
    let loop_ticks = config.total_substeps();
    let tail_ticks =
        (config.decay_time / config.tick_period.as_secs_f32()).ceil() as usize;
    assert_eq!(samples.len(), (loop_ticks + tail_ticks) * config.block_size);
    assert!(samples.iter().any(|&s| s != 0), "marked grid must be audible");

    std::fs::remove_file(&path).ok();
}
