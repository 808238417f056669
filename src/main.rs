use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use std::{error::Error, io};

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

mod app;
mod cli;
mod config;
mod error;
mod icons;
mod units;
mod weather;
mod weatherapi;

use crate::app::run_app;
use crate::cli::Args;
use crate::config::Config;

fn log_filter(verbose: u8) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn,wxnow=info",
        1 => "info,wxnow=debug",
        _ => "debug,wxnow=trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// The TUI owns the terminal, so it logs to a daily file. Returns a guard
/// that must be held until exit.
fn init_file_logging(verbose: u8) -> Option<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*};

    let logs_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wxnow")
        .join("logs");
    std::fs::create_dir_all(&logs_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "wxnow.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    Some(guard)
}

fn init_stderr_logging(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*};

    tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_tui(config: &Config) -> Result<(), Box<dyn Error>> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let refresh = Duration::from_secs(config.refresh_minutes.saturating_mul(60));
    let res = run_app(&mut terminal, refresh, || weather::load(config));

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run(args: &Args) -> Result<ExitCode, Box<dyn Error>> {
    let (config, path) = config::resolve(args)?;

    if args.save {
        match path {
            Some(ref path) => {
                config.save(path)?;
                eprintln!("Saved settings to {}", path.display());
            }
            None => return Err("no config directory available, pass --config".into()),
        }
    }

    if args.once {
        let screen = weather::load(&config);
        print!("{screen}");
        return Ok(if screen.is_loaded() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    run_tui(&config)?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let _guard = if args.once {
        init_stderr_logging(args.verbose);
        None
    } else {
        init_file_logging(args.verbose)
    };
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "exiting");
            eprintln!("wxnow: {err}");
            ExitCode::FAILURE
        }
    }
}
