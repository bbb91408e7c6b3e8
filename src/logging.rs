use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use env_logger::{Builder, Target};
use log::LevelFilter;

pub const LOG_FILE: &str = "calcr.log";

pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Route log output to `<dir>/calcr.log`; the terminal belongs to the UI.
/// `RUST_LOG` overrides the verbosity level. Logging stays off if the file
/// cannot be opened.
pub fn init(verbose: u8, dir: &Path) {
    let file = fs::create_dir_all(dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
    });
    let Ok(file) = file else {
        return;
    };

    let result = Builder::new()
        .filter_level(level_for(verbose))
        .parse_default_env()
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
    if let Err(err) = result {
        // A logger is already installed; keep using it.
        eprintln!("calcr: logging not reinitialised: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(7), LevelFilter::Trace);
    }

    #[test]
    fn init_creates_log_file_and_tolerates_repeat_calls() {
        let dir = tempfile::TempDir::new().unwrap();
        init(1, dir.path());
        init(2, dir.path());
        assert!(dir.path().join(LOG_FILE).exists());
    }
}
