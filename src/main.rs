mod cli;
mod clock;
mod command;
mod config;
mod logger;
mod policy;
mod scene;
mod sheet;
mod status;
mod view;

use console::style;

fn main() {
    // Logging is best-effort: an unwritable state dir shouldn't stop rendering
    let log_guard = logger::init().ok();
    tracing::debug!(args = ?std::env::args().collect::<Vec<_>>(), "spritemux:start");

    if let Err(e) = cli::run() {
        tracing::error!(error = %format_args!("{:#}", e), "spritemux:failed");
        eprintln!("{} {:#}", style("error:").red().bold(), e);
        // exit() skips destructors; flush the log writer first
        drop(log_guard);
        std::process::exit(1);
    }
}
