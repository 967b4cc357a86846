use std::{io, path::PathBuf};

use anyhow::{bail, Result};
use clap::Parser;
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use backend_bridge::{commands::BackendCommand, runtime};
use controller::events::UiEvent;
use ui::app::StorefrontApp;

#[derive(Parser, Debug)]
#[command(name = "storefront", about = "Terminal storefront backed by a REST cart service")]
struct Args {
    /// Base url of the cart service, e.g. http://localhost:8080/api/v1
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    user_id: Option<String>,
    /// Settings file; defaults to ./storefront.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Render the loaded storefront once and exit.
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    settings.apply_cli(args.api_url, args.user_id);
    let settings = settings.validate()?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    let worker = runtime::launch(settings, cmd_rx, ui_tx);

    let mut app = StorefrontApp::new(cmd_tx, ui_rx, io::stdout());
    let outcome = if args.once {
        app.run_once()
    } else {
        app.run_interactive()
    };
    let startup_failure = app
        .state()
        .backend_failed
        .then(|| app.state().status.clone());
    drop(app);

    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    outcome?;
    if let Some(message) = startup_failure {
        bail!(message);
    }
    Ok(())
}
