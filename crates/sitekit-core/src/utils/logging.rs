//! Verbose console output and log level selection for front-ends

use log::LevelFilter;

/// Print a verbose line when enabled; always forwarded to the `debug` log
pub fn print_verbose(verbose: bool, msg: &str) {
    if verbose {
        println!("Verbose: {}", msg);
    }
    log::debug!("{}", msg);
}

/// Level used when `RUST_LOG` is not set
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}
