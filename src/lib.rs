pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{AmapClient, GeoEngineClient, LocalStorage, ReportWriter};
pub use config::AppConfig;
pub use crate::core::{IsochroneService, LifeCircleEvaluator};
pub use domain::model::{EvaluationRequest, EvaluationResult, IsochroneRequest, IsochroneResult};
pub use utils::error::{LifeCircleError, Result};
