pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod spin;
pub mod spin_log;

pub use app::{LifecycleError, WheelEatApp};
pub use config::{AppConfig, ConfigError, HostEnvironment};

pub fn build_app(config: AppConfig) -> WheelEatApp {
    WheelEatApp::new(config)
}
