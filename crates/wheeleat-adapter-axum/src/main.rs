use anyhow::Context;
use simple_logger::SimpleLogger;
use wheeleat_core::{AppConfig, HostEnvironment, WheelEatApp};

const MANIFEST: &str = include_str!("../../../wheeleat.toml");

fn load_config() -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::from_toml_str(MANIFEST).context("invalid wheeleat.toml")?;
    config
        .apply_env_overrides()
        .context("invalid WHEELEAT_* override")?;
    Ok(config.with_environment(HostEnvironment::Local))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("failed to listen for ctrl-c: {}", err);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = load_config()?;
    SimpleLogger::new()
        .with_level(config.logging.level)
        .init()
        .context("failed to initialise logger")?;

    let addr = config.server.listen_addr.clone();
    let app = WheelEatApp::new(config);
    app.startup().await.context("startup hook failed")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    log::info!("listening on http://{}", addr);

    axum::serve(listener, app.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    app.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("wheeleat adapter failed: {err:#}");
        std::process::exit(1);
    }
}
