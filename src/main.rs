use anyhow::Context;
use clap::Parser;
use life_circle::config::{Command, EvaluateArgs, IsochroneArgs};
use life_circle::core::catalog::{categories_or_default, standards_or_default};
use life_circle::core::distance::distance_for_time;
use life_circle::utils::error::{ErrorSeverity, LifeCircleError};
use life_circle::utils::{logger, validation::Validate};
use life_circle::{
    AmapClient, AppConfig, CliConfig, GeoEngineClient, IsochroneService, LifeCircleEvaluator,
    LocalStorage, ReportWriter,
};

fn load_config(path: &str) -> anyhow::Result<AppConfig> {
    let config = AppConfig::from_file(path).with_context(|| format!("failed to load config file '{}'", path))?;
    config
        .validate()
        .with_context(|| format!("invalid configuration in '{}'", path))?;
    Ok(config)
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 4,      // 輸入錯誤
        ErrorSeverity::Medium => 2,   // 外部服務錯誤，可重試
        ErrorSeverity::High => 1,     // 處理錯誤
        ErrorSeverity::Critical => 3, // 系統或配置錯誤
    }
}

fn report_failure(e: &LifeCircleError) -> i32 {
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    exit_code(e.severity())
}

fn print_dry_run(cli: &CliConfig, config: &AppConfig) {
    println!("🔍 Dry run, no provider will be contacted");
    println!("   geo engine : {} (timeout {:?})", config.geo_engine.endpoint, config.geo_engine.timeout());
    println!(
        "   external   : {} ({})",
        config.amap.endpoint(),
        if config.amap.is_enabled() { "enabled" } else { "disabled" }
    );
    println!("   output     : {}", config.output.path());

    match &cli.command {
        Command::Evaluate(args) => match args.to_request(&config.evaluation).normalize() {
            Ok(params) => {
                println!(
                    "   evaluate   : ({:.6}, {:.6}) {} min @ {} km/h, external {}",
                    params.origin.lng,
                    params.origin.lat,
                    params.time_threshold,
                    params.walk_speed,
                    params.use_external
                );
                println!(
                    "   search radius: {:.0} m",
                    distance_for_time(params.walk_speed, params.time_threshold)
                );
            }
            Err(e) => println!("   ❌ {}", e),
        },
        Command::Isochrone(args) => match args.to_request(&config.evaluation).normalize() {
            Ok(params) => {
                for minutes in &params.time_thresholds {
                    println!(
                        "   {:>3} min  : {:.1} m @ {} km/h",
                        minutes,
                        distance_for_time(params.walk_speed, *minutes),
                        params.walk_speed
                    );
                }
            }
            Err(e) => println!("   ❌ {}", e),
        },
        Command::Standards | Command::Categories => {}
    }
}

async fn evaluate(config: &AppConfig, args: &EvaluateArgs) -> life_circle::Result<()> {
    let request = args.to_request(&config.evaluation);
    let params = request.normalize()?;

    let geo = GeoEngineClient::from_config(&config.geo_engine)?;
    let external = AmapClient::from_config(&config.amap)?;
    let evaluator = LifeCircleEvaluator::new(geo, external).with_timeout(config.evaluation.timeout());

    let result = evaluator.evaluate(&request).await?;

    println!("✅ 综合得分 {:.1}，等级 {}", result.total_score, result.grade);
    println!("   {}", result.summary);
    for cs in &result.category_scores {
        println!(
            "   {:<10} {:>5.1}  (POI {}{})",
            cs.name,
            cs.score,
            cs.poi_count,
            if cs.has_required { "" } else { "，缺少必备设施" }
        );
    }
    for suggestion in &result.suggestions {
        println!("💡 {}", suggestion);
    }

    let writer = ReportWriter::new(LocalStorage::new(config.output.path()), config.output.write_poi_csv());
    let paths = writer.write_evaluation(&params, &result).await?;
    println!("📁 Report saved to: {}", paths.report);
    if let Some(pois) = paths.pois {
        println!("📁 POIs saved to: {}", pois);
    }

    Ok(())
}

async fn isochrone(config: &AppConfig, args: &IsochroneArgs) -> life_circle::Result<()> {
    let params = args.to_request(&config.evaluation).normalize()?;
    let geo = GeoEngineClient::from_config(&config.geo_engine)?;

    let service = IsochroneService::new(&geo);
    let result = service.calculate_with(&params).await?;
    for polygon in &result.polygons {
        println!("✅ {:>3} min  {:.1} m", polygon.minutes, polygon.distance_m);
    }

    let collection = life_circle::core::features::isochrone_collection(&result);
    let writer = ReportWriter::new(LocalStorage::new(config.output.path()), false);
    let path = writer.write_isochrones(&params, &collection).await?;
    println!("📁 Isochrones saved to: {}", path);

    Ok(())
}

async fn run(cli: &CliConfig, config: &AppConfig) -> life_circle::Result<()> {
    match &cli.command {
        Command::Evaluate(args) => evaluate(config, args).await,
        Command::Isochrone(args) => isochrone(config, args).await,
        Command::Standards => {
            let geo = GeoEngineClient::from_config(&config.geo_engine)?;
            let standards = standards_or_default(&geo).await;
            println!("{}", serde_json::to_string_pretty(&standards)?);
            Ok(())
        }
        Command::Categories => {
            let geo = GeoEngineClient::from_config(&config.geo_engine)?;
            let categories = categories_or_default(&geo).await;
            println!("{}", serde_json::to_string_pretty(&categories)?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = load_config(&cli.config);

    // 初始化日誌；設定檔讀不到時用命令列參數
    let (level, json) = match &config {
        Ok(config) => (config.logging.level.clone(), cli.json_logs || config.logging.json),
        Err(_) => (None, cli.json_logs),
    };
    if json {
        logger::init_json_logger(cli.verbose, level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, level.as_deref());
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {:#}", e);
            eprintln!("❌ {:#}", e);
            let code = match e.downcast_ref::<LifeCircleError>() {
                Some(inner) => {
                    eprintln!("💡 建議: {}", inner.recovery_suggestion());
                    exit_code(inner.severity())
                }
                None => 3,
            };
            std::process::exit(code);
        }
    };

    tracing::info!("🚀 Starting life-circle");
    if cli.verbose {
        tracing::debug!("CLI: {:?}", cli);
    }

    if cli.dry_run {
        print_dry_run(&cli, &config);
        return;
    }

    if let Err(e) = run(&cli, &config).await {
        std::process::exit(report_failure(&e));
    }
}
