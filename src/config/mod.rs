pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "life-circle")]
#[command(about = "15-minute life circle evaluation and isochrone tool")]
pub struct CliConfig {
    #[arg(long, global = true, default_value = "life-circle.toml", help = "TOML configuration file")]
    pub config: String,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, global = true, help = "Print the resolved request without calling any provider")]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 綜合評價
    Evaluate(EvaluateArgs),
    /// 只計算等時圈
    Isochrone(IsochroneArgs),
    /// 列出評價標準
    Standards,
    /// 列出 POI 分類體系
    Categories,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct EvaluateArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(long, help = "Walking speed in km/h, clamped to [3, 7]")]
    pub walk_speed: Option<f64>,

    #[arg(long, help = "Minutes used for the POI query and external search")]
    pub time_threshold: Option<u32>,

    #[arg(long, help = "Skip the external map provider")]
    pub no_external: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct IsochroneArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(long, value_delimiter = ',', help = "Time thresholds in minutes, e.g. 5,10,15")]
    pub thresholds: Vec<u32>,

    #[arg(long)]
    pub walk_speed: Option<f64>,
}

#[cfg(feature = "cli")]
impl EvaluateArgs {
    /// 命令列沒給的參數用設定檔的預設值補上
    pub fn to_request(&self, defaults: &toml_config::EvaluationConfig) -> crate::domain::model::EvaluationRequest {
        crate::domain::model::EvaluationRequest {
            lng: Some(self.lng),
            lat: Some(self.lat),
            time_threshold: self.time_threshold.or(defaults.time_threshold),
            walk_speed: self.walk_speed.or(defaults.walk_speed),
            use_external: !self.no_external,
        }
    }
}

#[cfg(feature = "cli")]
impl IsochroneArgs {
    pub fn to_request(&self, defaults: &toml_config::EvaluationConfig) -> crate::domain::model::IsochroneRequest {
        crate::domain::model::IsochroneRequest {
            lng: Some(self.lng),
            lat: Some(self.lat),
            time_thresholds: self.thresholds.clone(),
            walk_speed: self.walk_speed.or(defaults.walk_speed),
        }
    }
}
