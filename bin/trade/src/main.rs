use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use common::Config;
use engine::{Engine, SessionState, Shutdown};
use risk::RiskConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    // stdout carries the action protocol, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let risk = match RiskConfig::load(&cfg.settings_path) {
        Ok(risk) => risk,
        Err(e) => exit_with(e),
    };
    info!(
        settings = %cfg.settings_path.display(),
        risk_fraction = risk.risk_fraction,
        saver_mode = risk.saver_mode,
        "Trade bot starting"
    );

    // ── Command loop ──────────────────────────────────────────────────────────
    let mut engine = Engine::new(SessionState::new(risk));
    let stdin = BufReader::new(tokio::io::stdin());
    match engine.run(stdin, tokio::io::stdout()).await {
        Ok(Shutdown::EndCommand) => info!("Shutting down"),
        Ok(Shutdown::EndOfInput) => info!("Input closed, shutting down"),
        Err(e) => exit_with(e),
    }
}

fn exit_with(e: common::Error) -> ! {
    error!(error = %e, "Fatal error");
    eprintln!("{e}");
    std::process::exit(e.exit_code());
}
