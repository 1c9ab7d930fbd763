//! GuardianNet console.
//!
//! A terminal rendition of the GuardianNet disaster-response demo: the live
//! landslide map, the scripted assistant, volunteer verification, the
//! volunteer phone and the KSDMA control center.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line protocol suitable for scripted demos:
//!
//! ```bash
//! echo -e "#trigger\n#wait 4000\n#quit" | cargo run -p guardian -- --headless
//! ```

mod app;
mod events;
mod headless;
mod ui;

use std::fs::{self, OpenOptions};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use guardian_core::config::ENV_LANG_FILE;
use guardian_core::schedule::{is_valid_time_scale, MAX_TIME_SCALE};
use guardian_core::{GuardianConfig, GuardianSession, JsonFileStore};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

#[derive(Parser)]
#[command(name = "guardian")]
#[command(author, version, about = "GuardianNet disaster-response demo console", long_about = None)]
struct Cli {
    /// Run the line protocol on stdin/stdout instead of the TUI
    #[arg(long)]
    headless: bool,

    /// Where the language preference is stored
    #[arg(long, env = ENV_LANG_FILE)]
    lang_file: Option<PathBuf>,

    /// Multiplier for every scripted delay (0.5 runs twice as fast)
    #[arg(long, value_parser = parse_time_scale)]
    time_scale: Option<f64>,

    /// Seed for typing delays and dashboard jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_time_scale(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(scale) if is_valid_time_scale(scale) => Ok(scale),
        _ => Err(format!("expected a number above 0 and at most {MAX_TIME_SCALE}, got {raw:?}")),
    }
}

impl Cli {
    /// Layer command-line flags over the environment configuration.
    fn apply(&self, mut config: GuardianConfig) -> GuardianConfig {
        if let Some(path) = &self.lang_file {
            config = config.with_lang_file(path);
        }
        if let Some(scale) = self.time_scale {
            config = config.with_time_scale(scale);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.verbose {
            config = config.with_log_filter("debug");
        }
        config
    }
}

fn log_filter(config: &GuardianConfig) -> EnvFilter {
    EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Headless output owns stdout, so logs go to stderr.
fn init_stderr_logging(config: &GuardianConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config))
        .with_writer(std::io::stderr)
        .init();
}

/// The TUI owns the terminal, so logs go to a file next to the settings.
fn init_file_logging(config: &GuardianConfig) -> Result<PathBuf> {
    let path = config.log_file();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.apply(GuardianConfig::from_env()?);

    if cli.headless {
        init_stderr_logging(&config);
        let session = GuardianSession::new(&config, JsonFileStore::new(&config.lang_file)).await?;
        return headless::run_headless(session).await;
    }

    let log_path = init_file_logging(&config)?;
    tracing::info!(log = %log_path.display(), lang_file = %config.lang_file.display(), "starting console");
    let session = GuardianSession::new(&config, JsonFileStore::new(&config.lang_file)).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(session)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "console exited with an error");
    }
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, &app))?;

        // Persist a language change requested by the last key press
        if let Some(language) = app.pending_language.take() {
            match app.session.set_language(language).await {
                Ok(()) => app.set_status(format!("Language: {}", language.native_name())),
                Err(e) => app.set_status(format!("Language changed but not saved: {e}")),
            }
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev, Instant::now()) == EventResult::Quit {
                break;
            }
        }

        app.tick(Instant::now());
    }

    app.session.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_scale_flag_bounds() {
        assert_eq!(parse_time_scale("0.5"), Ok(0.5));
        assert_eq!(parse_time_scale("1000"), Ok(MAX_TIME_SCALE));
        for bad in ["0", "-1", "fast", "inf", "1e300"] {
            assert!(parse_time_scale(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_flags_layer_over_config() {
        let cli = Cli::parse_from(["guardian", "--headless", "--time-scale", "0.25", "--seed", "9"]);
        assert!(cli.headless);
        let config = cli.apply(GuardianConfig::new());
        assert_eq!(config.time_scale, 0.25);
        assert_eq!(config.seed, Some(9));
        assert!(Cli::try_parse_from(["guardian", "--time-scale", "1e300"]).is_err());
    }
}
