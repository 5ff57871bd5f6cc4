use std::process::ExitCode;
use std::sync::Arc;

use devserve::config::{AppState, Config};
use devserve::logger;
use devserve::server::{self, Shutdown};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_fatal(e.as_ref());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // One thread: connections are served one after another
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(cfg)?);
    let shutdown = Arc::new(Shutdown::new());

    server::start_signal_handler(Arc::clone(&shutdown));
    server::start(state, shutdown).await?;

    Ok(())
}
