use crate::utils::error::{LifeCircleError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, validate_url,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_AMAP_ENDPOINT: &str = "https://restapi.amap.com/v3/place/around";

/// 醫療、教育、養老、商業、餐飲、文化、公共、交通、體育、公園
pub const DEFAULT_AMAP_TYPES: &[&str] = &[
    "090000", "141200", "141300", "141400", "100100", "060400", "050000", "080000", "110000",
    "130000", "150200", "150500", "160100",
];

/// 外部服務單頁上限
pub const MAX_AMAP_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub geo_engine: GeoEngineConfig,
    #[serde(default)]
    pub amap: AmapConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoEngineConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmapConfig {
    #[serde(default)]
    pub key: String,
    /// 未設定時依 key 是否存在決定
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub types: Option<Vec<String>>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub timeout_seconds: Option<u64>,
    pub time_threshold: Option<u32>,
    pub walk_speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub write_poi_csv: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    #[serde(default)]
    pub json: bool,
}

fn unresolved_placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"^\$\{[^}]+\}$").expect("valid placeholder pattern"))
}

impl GeoEngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(30))
    }
}

impl AmapConfig {
    /// 替換後仍是 `${VAR}` 的 key 視為未設定
    pub fn resolved_key(&self) -> Option<&str> {
        let key = self.key.trim();
        if key.is_empty() || unresolved_placeholder().is_match(key) {
            return None;
        }
        Some(key)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true) && self.resolved_key().is_some()
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_AMAP_ENDPOINT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(10))
    }

    /// 以 `|` 串接的類型碼
    pub fn types_param(&self) -> String {
        match &self.types {
            Some(types) if !types.is_empty() => types.join("|"),
            _ => DEFAULT_AMAP_TYPES.join("|"),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(MAX_AMAP_PAGE_SIZE)
    }
}

impl EvaluationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(60))
    }
}

impl OutputConfig {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("./output")
    }

    pub fn write_poi_csv(&self) -> bool {
        self.write_poi_csv.unwrap_or(true)
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LifeCircleError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LifeCircleError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${AMAP_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("geo_engine.endpoint", &self.geo_engine.endpoint)?;
        if let Some(timeout) = self.geo_engine.timeout_seconds {
            validate_positive_number("geo_engine.timeout_seconds", timeout, 1)?;
        }

        if self.amap.enabled == Some(true) {
            validate_non_empty_string("amap.key", &self.amap.key)?;
            if self.amap.resolved_key().is_none() {
                return Err(LifeCircleError::InvalidConfigValueError {
                    field: "amap.key".to_string(),
                    value: self.amap.key.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }
        validate_url("amap.endpoint", self.amap.endpoint())?;
        if let Some(timeout) = self.amap.timeout_seconds {
            validate_positive_number("amap.timeout_seconds", timeout, 1)?;
        }
        if let Some(page_size) = self.amap.page_size {
            validate_range("amap.page_size", page_size, 1, MAX_AMAP_PAGE_SIZE)?;
        }

        if let Some(timeout) = self.evaluation.timeout_seconds {
            validate_positive_number("evaluation.timeout_seconds", timeout, 1)?;
        }
        if let Some(minutes) = self.evaluation.time_threshold {
            validate_positive_number("evaluation.time_threshold", u64::from(minutes), 1)?;
        }

        validate_path("output.path", self.output.path())?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
