//! Serverless host adapter.
//!
//! Wraps a [`WheelEatApp`] so the Lambda runtime can invoke it once per event:
//! the host event (already decoded by `lambda_http`) is dispatched through the
//! application's router and the response is collected into the shape the host
//! expects. The application is injected at construction and told it runs
//! serverless through its config, never through process-wide state.

use std::sync::Arc;

use axum::Router;
use http_body_util::BodyExt;
use lambda_http::http::{header, HeaderMap};
use lambda_http::{Body, Error, Request, Response};
use tower::ServiceExt;
use wheeleat_core::{AppConfig, ConfigError, HostEnvironment, LifecycleError, WheelEatApp};

/// Whether the application's startup/shutdown hooks run under this host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifespan {
    On,
    /// Function instances have no lifecycle events to hang hooks on.
    #[default]
    Off,
}

#[derive(Debug, Clone)]
pub struct AdapterOptions {
    pub lifespan: Lifespan,
    /// Content-type prefixes returned as text; anything else goes back as
    /// binary and is base64-encoded by the runtime.
    pub text_content_types: Vec<String>,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        AdapterOptions {
            lifespan: Lifespan::Off,
            text_content_types: [
                "text/",
                "application/json",
                "application/javascript",
                "application/xml",
                "image/svg+xml",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("invalid application config: {0}")]
    Config(#[from] ConfigError),
    #[error("application startup failed: {0}")]
    Startup(#[from] LifecycleError),
    #[error("failed to read response body: {0}")]
    Body(#[from] axum::Error),
}

/// Parse the manifest, apply `WHEELEAT_*` overrides and mark the config as
/// serverless.
pub fn serverless_config(manifest: &str) -> Result<AppConfig, AdapterError> {
    let mut config = AppConfig::from_toml_str(manifest)?;
    config.apply_env_overrides()?;
    Ok(config.with_environment(HostEnvironment::Serverless))
}

#[derive(Clone)]
pub struct Adapter {
    app: WheelEatApp,
    router: Router,
    options: Arc<AdapterOptions>,
}

impl Adapter {
    pub async fn new(app: WheelEatApp, options: AdapterOptions) -> Result<Self, AdapterError> {
        match options.lifespan {
            Lifespan::On => app.startup().await?,
            Lifespan::Off => log::debug!("lifespan off; skipping startup hook"),
        }
        let router = app.router();
        Ok(Adapter {
            app,
            router,
            options: Arc::new(options),
        })
    }

    pub async fn from_manifest(manifest: &str, options: AdapterOptions) -> Result<Self, AdapterError> {
        let config = serverless_config(manifest)?;
        Adapter::new(WheelEatApp::new(config), options).await
    }

    pub fn app(&self) -> &WheelEatApp {
        &self.app
    }

    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    /// Handle one host event.
    pub async fn handle(&self, event: Request) -> Result<Response<Body>, Error> {
        let (parts, body) = event.into_parts();
        let body = match body {
            Body::Empty => axum::body::Body::empty(),
            Body::Text(text) => axum::body::Body::from(text),
            Body::Binary(bytes) => axum::body::Body::from(bytes),
        };
        let req = axum::http::Request::from_parts(parts, body);

        let res = self.router.clone().oneshot(req).await?;
        let (parts, body) = res.into_parts();
        let bytes = body.collect().await.map_err(AdapterError::Body)?.to_bytes();
        let body = encode_body(&parts.headers, bytes.to_vec(), &self.options.text_content_types);
        Ok(Response::from_parts(parts, body))
    }
}

fn is_text(headers: &HeaderMap, text_content_types: &[String]) -> bool {
    let Some(ct) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let ct = ct.to_ascii_lowercase();
    text_content_types.iter().any(|prefix| ct.starts_with(prefix.as_str()))
}

fn encode_body(headers: &HeaderMap, bytes: Vec<u8>, text_content_types: &[String]) -> Body {
    if bytes.is_empty() {
        return Body::Empty;
    }
    if is_text(headers, text_content_types) {
        match String::from_utf8(bytes) {
            Ok(text) => Body::Text(text),
            Err(e) => Body::Binary(e.into_bytes()),
        }
    } else {
        Body::Binary(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::http::HeaderValue;

    fn headers(ct: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
        h
    }

    fn text_types() -> Vec<String> {
        AdapterOptions::default().text_content_types
    }

    #[test]
    fn default_options_disable_lifespan() {
        assert_eq!(AdapterOptions::default().lifespan, Lifespan::Off);
        assert_eq!(Lifespan::default(), Lifespan::Off);
    }

    #[test]
    fn json_and_text_bodies_stay_text() {
        let body = encode_body(&headers("application/json"), b"{\"a\":1}".to_vec(), &text_types());
        assert!(matches!(body, Body::Text(ref t) if t == "{\"a\":1}"));
        let body = encode_body(&headers("Text/HTML; charset=utf-8"), b"<p>".to_vec(), &text_types());
        assert!(matches!(body, Body::Text(_)));
    }

    #[test]
    fn unknown_or_missing_content_type_is_binary() {
        let body = encode_body(&headers("image/png"), vec![0x89, 0x50], &text_types());
        assert!(matches!(body, Body::Binary(ref b) if b == &vec![0x89, 0x50]));
        let body = encode_body(&HeaderMap::new(), b"plain".to_vec(), &text_types());
        assert!(matches!(body, Body::Binary(_)));
    }

    #[test]
    fn invalid_utf8_falls_back_to_binary() {
        let body = encode_body(&headers("text/plain"), vec![0xff, 0xfe], &text_types());
        assert!(matches!(body, Body::Binary(_)));
    }

    #[test]
    fn empty_body_is_empty() {
        let body = encode_body(&headers("application/json"), Vec::new(), &text_types());
        assert!(matches!(body, Body::Empty));
    }
}
