use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::Level;
use std::io::Write;

use crate::utils::config::PackagePaths;

/// Colors for the end-of-run summary.
pub struct Colors;

impl Colors {
    pub const OK: &'static str = "green";
    pub const FAILED: &'static str = "red";
    pub const SKIPPED: &'static str = "yellow";

    pub fn colorize(color: &str, text: &str) -> ColoredString {
        text.color(color)
    }
}

/// Last path segment of a log target, e.g. `graypipe::pipeline::loader` → `loader`.
fn stage_of(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

/// Install the env_logger backend: our crate at Info (Debug when `verbose`), dependencies
/// at Warn, `RUST_LOG` still honored. Safe to call more than once.
pub fn setup_logging(verbose: bool) {
    use log::LevelFilter;

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(PackagePaths::get().pkg_name(), level) // Our crate: use requested level
        .format(|buf, record| {
            let name = PackagePaths::get().pkg_name();
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        Level::Error => "ERROR".red(),
                        _ => unreachable!(),
                    };
                    let path = record.target().to_string().white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                }
                // Stage threads interleave; tag debug lines with the emitting module.
                Level::Debug | Level::Trace => format!(
                    "[{} {}] {}",
                    name.cyan(),
                    stage_of(record.target()).dimmed(),
                    record.args()
                ),
                Level::Info => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
