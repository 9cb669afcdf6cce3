/* Terminal front-end for the tonegrid step sequencer.
Draws the grid in raw mode, resolves key input to engine commands, and
drives the tick loop: advance, synthesize, encode, write to the device.
*/

#[cfg(feature = "native")]
use std::io::{self, Write};
#[cfg(feature = "native")]
use std::time::Duration;

#[cfg(feature = "native")]
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};

#[cfg(feature = "native")]
use tonegrid::{AudioSink, Command, CpalSink, Engine, EngineConfig, TickClock};

#[cfg(feature = "native")]
fn main() -> anyhow::Result<()> {
    tonegrid::utils::init_logger();

    let config = EngineConfig::default();
    let mut engine = Engine::new(config.clone())?;
    let mut sink = CpalSink::open(config.sample_rate, config.block_size)?;

    execute!(io::stdout(), Clear(ClearType::All), cursor::Hide)?;
    enable_raw_mode()?;
    let result = run(&mut engine, &mut sink);
    execute!(io::stdout(), cursor::Show)?;
    disable_raw_mode()?;
    println!();
    result
}

#[cfg(feature = "native")]
fn run(engine: &mut Engine, sink: &mut CpalSink) -> anyhow::Result<()> {
    let mut clock = TickClock::new(engine.config().tick_period);
    let mut selection = (0usize, 0usize); // (column, row)

    loop {
        // Drain pending input before the tick so edits land between blocks
        while event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent { code, .. }) = event::read()? {
                match code {
                    KeyCode::Left => selection.0 = selection.0.saturating_sub(1),
                    KeyCode::Right => {
                        selection.0 = (selection.0 + 1).min(engine.config().columns - 1)
                    }
                    KeyCode::Up => selection.1 = selection.1.saturating_sub(1),
                    KeyCode::Down => {
                        selection.1 = (selection.1 + 1).min(engine.config().rows - 1)
                    }
                    KeyCode::Enter | KeyCode::Char('x') => engine.apply(Command::Pick {
                        column: selection.0,
                        row: selection.1,
                    }),
                    KeyCode::Char(' ') => engine.apply(Command::TogglePlayback),
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        engine.apply(Command::SetGain(engine.gain() + 5))
                    }
                    KeyCode::Char('-') => engine.apply(Command::SetGain(engine.gain() - 5)),
                    KeyCode::Char('r') | KeyCode::Char('R') => engine.apply(Command::Reset),
                    #[cfg(feature = "bounce")]
                    KeyCode::Char('b') | KeyCode::Char('B') => {
                        let path = std::path::Path::new("tonegrid-bounce.wav");
                        match tonegrid::bounce::bounce_to_wav(engine, path) {
                            Ok(()) => log::info!("bounced one loop to {}", path.display()),
                            Err(err) => log::error!("bounce failed: {err:#}"),
                        }
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                    _ => {}
                }
            }
        }

        clock.wait();
        let block = engine.tick();
        sink.write(block)?;

        render(engine, selection)?;
    }
}

#[cfg(feature = "native")]
fn make_bar(normalized: f32, width: usize) -> String {
    let filled = ((normalized * width as f32).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(feature = "native")]
fn render(engine: &Engine, selection: (usize, usize)) -> anyhow::Result<()> {
    let config = engine.config();
    let cursor_column = engine.transport().cursor_column();

    // Home the cursor and overdraw; \x1b[K clears each line's tail
    print!("\x1b[H");
    print!(
        "tonegrid - {}x{} grid @ {} Hz\x1b[K\r\n",
        config.columns, config.rows, config.sample_rate
    );
    print!("ARROWS=select ENTER=place/clear SPACE=play/pause -/+=gain R=reset Q=quit\x1b[K\r\n");
    let status = if engine.is_playing() {
        "PLAYING"
    } else {
        "STOPPED"
    };
    print!(
        "{:7}  gain [{}] {:>3}\x1b[K\r\n",
        status,
        make_bar(engine.gain() as f32 / 100.0, 10),
        engine.gain()
    );
    print!("\x1b[K\r\n");

    // Cursor marker above the grid
    print!("{:9}", "");
    for column in 0..config.columns {
        if column == cursor_column {
            print!(" v  ");
        } else {
            print!("    ");
        }
    }
    print!("\x1b[K\r\n");

    // One line per row, highest pitch on top, labelled with its frequency
    for row in 0..config.rows {
        let frequency = config.frequencies[config.rows - 1 - row];
        print!("{:>8} ", format!("{frequency:.2}"));
        for column in 0..config.columns {
            let mark = if engine.grid().lookup(column) == Some(row) {
                '#'
            } else {
                '.'
            };
            if (column, row) == selection {
                print!("[{mark}] ");
            } else {
                print!(" {mark}  ");
            }
        }
        print!("\x1b[K\r\n");
    }

    io::stdout().flush()?;
    Ok(())
}

#[cfg(not(feature = "native"))]
fn main() {
    println!("This binary is only available with the 'native' feature enabled.");
}
