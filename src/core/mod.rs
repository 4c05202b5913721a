pub mod catalog;
pub mod distance;
pub mod evaluation;
pub mod features;
pub mod isochrone;
pub mod merger;
pub mod scoring;
pub mod spatial_filter;
pub mod suggestions;
pub mod type_mapper;

pub use crate::domain::model::{EvaluationRequest, EvaluationResult, IsochroneRequest, IsochroneResult};
pub use crate::domain::ports::{ExternalPoiSource, GeoBackend, Storage};
pub use crate::utils::error::Result;
pub use evaluation::LifeCircleEvaluator;
pub use isochrone::IsochroneService;
