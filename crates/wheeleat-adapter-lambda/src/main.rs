use lambda_http::{service_fn, Error, Request};
use simple_logger::SimpleLogger;
use wheeleat_adapter_lambda::{serverless_config, Adapter, AdapterOptions};
use wheeleat_core::WheelEatApp;

const MANIFEST: &str = include_str!("../../../wheeleat.toml");

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Any failure here is a cold-start failure; the runtime reports it.
    let config = serverless_config(MANIFEST)?;
    SimpleLogger::new()
        .with_level(config.logging.level)
        .without_timestamps()
        .init()?;

    let app = WheelEatApp::new(config);
    let adapter = Adapter::new(app, AdapterOptions::default()).await?;
    log::info!(
        "handler ready: environment={}",
        adapter.app().environment().as_str()
    );

    let handler = service_fn(move |event: Request| {
        let adapter = adapter.clone();
        async move { adapter.handle(event).await }
    });
    lambda_http::run(handler).await
}
