//! Avidia - Main entry point
//!
//! Startup order: logging, signal handlers, CLI, settings, SDK checks.
//! Only then does the terminal switch to the full-screen interface.

use anyhow::Context;
use ratatui::backend::CrosstermBackend;
use std::fs::OpenOptions;
use std::io::stdout;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use avidia::app::{App, AppContext};
use avidia::cli::{Cli, Commands};
use avidia::config::Settings;
use avidia::hardware::HardwareInfo;
use avidia::process_guard::{self, ProcessGuard};
use avidia::tools::SdkLayout;
use avidia::ui::{install_panic_hook, TerminalKeys, TerminalSession, Surface};
use avidia::{commands, sanity};

/// Log file override
const LOG_ENV: &str = "AVIDIA_LOG";

/// Initialize tracing. The interface owns the terminal, so logs go to a
/// file; when it cannot be opened they are discarded.
fn init_logging() {
    let path = std::env::var_os(LOG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("avidia.log"));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true);

    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => builder.with_writer(std::sync::Mutex::new(file)).init(),
        Err(_) => builder.with_writer(std::io::sink).init(),
    }
}

/// What the interactive session opens with
enum Entry {
    MainMenu,
    Create(String),
    Install,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Avidia starting up");

    // Children are terminated and the terminal restored on SIGINT/SIGTERM/SIGHUP
    if let Err(e) = process_guard::init_signal_handlers() {
        tracing::warn!(error = %e, "Failed to initialize signal handlers");
    }

    let cli = Cli::parse_args();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "invalid settings");
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let sdk = SdkLayout::from_env();
    sanity::run_preflight_checks(&sdk);

    let result = match cli.command {
        Some(Commands::List) => commands::list(&sdk, &mut stdout()),
        Some(Commands::Start { name }) => {
            commands::start(&sdk, &settings, &HardwareInfo::detect(), &name)
        }
        Some(Commands::Stop { name }) => commands::stop(&sdk, &settings, &name),
        Some(Commands::Delete { name, yes }) => {
            commands::delete(&sdk, &settings, &name, yes, &mut std::io::stdin().lock())
        }
        Some(Commands::Create { name }) => return run_interactive(sdk, settings, Entry::Create(name)),
        Some(Commands::Install) => return run_interactive(sdk, settings, Entry::Install),
        Some(Commands::Tui) | None => return run_interactive(sdk, settings, Entry::MainMenu),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Run the full-screen interface until the user leaves it
fn run_interactive(sdk: SdkLayout, settings: Settings, entry: Entry) -> anyhow::Result<()> {
    println!("Loading SDK catalog...");
    let ctx = AppContext::discover(sdk, settings);

    // Declared before the session so children die after the terminal is back
    let guard = ProcessGuard::new();

    let session = TerminalSession::acquire().context("Failed to initialize terminal")?;
    install_panic_hook();
    let mut surface = Surface::new(CrosstermBackend::new(stdout()), TerminalKeys::default())
        .context("Failed to create terminal")?
        .with_session(session);

    let mut app = App::new(&ctx);
    let result = match entry {
        Entry::MainMenu => app.run(&mut surface),
        Entry::Create(name) => app.open_create(&mut surface, &name).map(|_| ()),
        Entry::Install => app
            .open(&mut surface, avidia::app::WizardKind::Install)
            .map(|_| ()),
    };

    // Leave the alternate screen before anything is printed
    drop(surface);
    if let Some((kind, outcome)) = &app.state().last_outcome {
        tracing::info!(wizard = %kind, ?outcome, "session ended");
    }
    if guard.child_count() > 0 {
        tracing::warn!(children = guard.child_count(), "tools still running, terminating them");
    }
    result.context("Interactive session failed")?;
    tracing::info!("Avidia exiting");
    Ok(())
}
