//! Logger setup for terminal applications

/// Initialize the logger for a terminal front-end.
///
/// Defaults to INFO; `RUST_LOG` overrides. Each line starts with a carriage
/// return so records stay aligned when the terminal is in raw mode.
pub fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "\r[{} {:5} {}] {}",
                buf.timestamp(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
