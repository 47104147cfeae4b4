use std::sync::Arc;

use axum::Router;

use crate::catalog;
use crate::config::{AppConfig, HostEnvironment};
use crate::routes::build_router;
use crate::spin_log::{InMemorySpinLogStore, SpinLogStore};

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("default mall {0:?} has no restaurants")]
    EmptyDefaultMall(String),
}

struct AppState {
    config: AppConfig,
    store: Arc<dyn SpinLogStore>,
}

/// The WheelEat application: configuration plus shared state, ready to be
/// mounted by any host adapter.
#[derive(Clone)]
pub struct WheelEatApp {
    state: Arc<AppState>,
}

impl WheelEatApp {
    pub fn new(config: AppConfig) -> Self {
        Self::with_store(config, Arc::new(InMemorySpinLogStore::new()))
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn SpinLogStore>) -> Self {
        WheelEatApp {
            state: Arc::new(AppState { config, store }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.config
    }

    pub fn environment(&self) -> HostEnvironment {
        self.state.config.environment
    }

    pub fn store(&self) -> &Arc<dyn SpinLogStore> {
        &self.state.store
    }

    pub fn router(&self) -> Router {
        build_router(self.clone())
    }

    /// Startup hook. Hosts with a process lifecycle call this once before
    /// serving; hosts without one skip it.
    pub async fn startup(&self) -> Result<(), LifecycleError> {
        let mall = &self.state.config.app.default_mall;
        let restaurants = catalog::restaurants_by_mall(mall);
        if restaurants.is_empty() {
            return Err(LifecycleError::EmptyDefaultMall(mall.clone()));
        }
        log::info!(
            "{} ready: environment={}, default_mall={}, restaurants={}, categories={}",
            self.state.config.app.name,
            self.environment().as_str(),
            mall,
            restaurants.len(),
            catalog::all_categories(mall).len()
        );
        Ok(())
    }

    pub async fn shutdown(&self) {
        match self.state.store.count().await {
            Ok(n) => log::info!("{} shutting down after {} spins", self.state.config.app.name, n),
            Err(e) => log::warn!("{} shutting down; spin count unavailable: {}", self.state.config.app.name, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mall: &str) -> AppConfig {
        AppConfig::from_toml_str(&format!(
            "[app]\nname = \"WheelEat\"\ndefault_mall = \"{}\"\n[logging]\nlevel = \"info\"\n",
            mall
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn startup_accepts_known_mall() {
        let app = WheelEatApp::new(config("sunway_square"));
        assert!(app.startup().await.is_ok());
        app.shutdown().await;
    }

    #[tokio::test]
    async fn startup_rejects_empty_default_mall() {
        let app = WheelEatApp::new(config("atlantis"));
        let err = app.startup().await.unwrap_err();
        assert!(matches!(err, LifecycleError::EmptyDefaultMall(ref m) if m == "atlantis"));
    }

    #[test]
    fn clones_share_state() {
        let app = WheelEatApp::new(config("sunway_square").with_environment(HostEnvironment::Serverless));
        let other = app.clone();
        assert!(Arc::ptr_eq(app.store(), other.store()));
        assert_eq!(other.environment(), HostEnvironment::Serverless);
    }
}
