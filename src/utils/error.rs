use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 評價流程中會致命失敗的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Scoring,
    Isochrone,
    PoiQuery,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Scoring => "scoring",
            PipelineStage::Isochrone => "isochrone",
            PipelineStage::PoiQuery => "poi query",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum LifeCircleError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{provider} returned an error (status {status}): {message}")]
    ProviderError {
        provider: String,
        status: String,
        message: String,
    },

    #[error("{stage} stage failed: {source}")]
    StageFailed {
        stage: PipelineStage,
        #[source]
        source: Box<LifeCircleError>,
    },

    #[error("Evaluation timed out after {limit:?}")]
    Timeout { limit: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Input,
    Provider,
    Pipeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LifeCircleError {
    /// 包裝成帶階段資訊的致命錯誤
    pub fn at_stage(self, stage: PipelineStage) -> Self {
        LifeCircleError::StageFailed {
            stage,
            source: Box::new(self),
        }
    }

    pub fn provider(provider: &str, status: impl fmt::Display, message: impl Into<String>) -> Self {
        LifeCircleError::ProviderError {
            provider: provider.to_string(),
            status: status.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LifeCircleError::ApiError(_) => ErrorCategory::Network,
            LifeCircleError::CsvError(_)
            | LifeCircleError::IoError(_)
            | LifeCircleError::SerializationError(_) => ErrorCategory::Data,
            LifeCircleError::ConfigError { .. }
            | LifeCircleError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            LifeCircleError::ValidationError { .. } => ErrorCategory::Input,
            LifeCircleError::ProviderError { .. } => ErrorCategory::Provider,
            LifeCircleError::StageFailed { .. } | LifeCircleError::Timeout { .. } => {
                ErrorCategory::Pipeline
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LifeCircleError::ValidationError { .. } => ErrorSeverity::Low,
            LifeCircleError::ApiError(_)
            | LifeCircleError::ProviderError { .. }
            | LifeCircleError::Timeout { .. } => ErrorSeverity::Medium,
            LifeCircleError::CsvError(_)
            | LifeCircleError::SerializationError(_)
            | LifeCircleError::StageFailed { .. } => ErrorSeverity::High,
            LifeCircleError::IoError(_)
            | LifeCircleError::ConfigError { .. }
            | LifeCircleError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LifeCircleError::ApiError(_) => {
                "Check network connectivity and that the provider endpoint is reachable".to_string()
            }
            LifeCircleError::ProviderError { provider, .. } => {
                format!("Check that {} is healthy and the request parameters are valid", provider)
            }
            LifeCircleError::StageFailed { stage, .. } => format!(
                "The geospatial engine failed during the {} stage; retry once it is available",
                stage
            ),
            LifeCircleError::Timeout { .. } => {
                "Increase [evaluation] timeout_seconds or check geospatial engine load".to_string()
            }
            LifeCircleError::ConfigError { .. } | LifeCircleError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again".to_string()
            }
            LifeCircleError::ValidationError { .. } => {
                "Provide both --lng and --lat for the origin coordinate".to_string()
            }
            LifeCircleError::IoError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
            LifeCircleError::CsvError(_) | LifeCircleError::SerializationError(_) => {
                "The provider returned data in an unexpected shape; check its version".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LifeCircleError::StageFailed { stage, .. } => {
                format!("評價失敗：{} 階段出錯", stage)
            }
            LifeCircleError::Timeout { limit } => format!("評價逾時（{:?}）", limit),
            LifeCircleError::ValidationError { message } => format!("請求參數錯誤：{}", message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LifeCircleError>;
