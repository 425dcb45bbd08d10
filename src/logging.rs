use chrono::{Local, NaiveTime};
use env_logger::{Builder, Env};
use std::io::Write;

/// Local wall-clock time as `HH:MM:SS.mmm`.
pub fn clock_stamp(time: NaiveTime) -> String {
    time.format("%H:%M:%S%.3f").to_string()
}

/// Event log format: `HH:MM:SS.mmm [<thread>] - <message>`.
///
/// Defaults to `info`; `RUST_LOG` overrides it.
pub fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        let thread = std::thread::current();
        writeln!(
            buf,
            "{} [{}] - {}",
            clock_stamp(Local::now().time()),
            thread.name().unwrap_or("unnamed"),
            record.args()
        )
    });
    builder
}

pub fn init_logging() {
    // A logger may already be installed by the embedding program
    let _ = builder().try_init();
}

/// Logger for tests: output is captured per test and double-init is ignored.
pub fn init_test_logging() {
    let _ = builder().is_test(true).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_stamp_is_padded_to_millis() {
        let time = NaiveTime::from_hms_milli_opt(9, 5, 3, 42).unwrap();
        assert_eq!(clock_stamp(time), "09:05:03.042");

        let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
        assert_eq!(clock_stamp(time), "23:59:59.999");
    }
}
