//! Host and service health monitoring engine
//!
//! Clients register periodic HTTP probes ("monitors"); the engine runs each one
//! on its own schedule and keeps a live view of every monitor's state.
//!
//! ```no_run
//! use std::time::Duration;
//! use hostmonitor::{Engine, config::EngineConfig, monitors::Monitor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = Engine::start(&EngineConfig::default())?;
//!     let monitor = Monitor::http_get(1, Duration::from_secs(60), "http://example.com", Duration::from_secs(5));
//!
//!     assert!(engine.register(monitor).await?);
//!     println!("{}", serde_json::to_string(&*engine.snapshot_read().await?)?);
//!     Ok(())
//! }
//! ```

pub mod actors;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod monitors;
pub mod util;
pub mod validation;

pub use engine::Engine;
pub use error::{EngineError, EngineResult};
