use clap::Parser;
use ean_batch::config::OutputFormat;
use ean_batch::core::{report, ConfigProvider};
use ean_batch::utils::error::{BarcodeError, ErrorSeverity};
use ean_batch::utils::{logger, validation::Validate};
use ean_batch::{AppConfig, BarcodeEngine, CliArgs, LabelJob, LabelPipeline, LocalStorage};

fn fail(e: &BarcodeError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 依錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting ean-batch");
    tracing::debug!("CLI args: {:?}", args);

    // 載入配置，命令列參數優先
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            AppConfig::from_file(path).unwrap_or_else(|e| fail(&e))
        }
        None => AppConfig::default(),
    };
    if let Some(output_path) = &args.output_path {
        config.export.output_path = output_path.clone();
    }
    if let Err(e) = config.validate() {
        fail(&e);
    }

    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let job = LabelJob {
        prefix: args.prefix.clone(),
        count: args.count.clone(),
        names: args.names.clone(),
        selection: args.select.clone(),
    };

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = LabelPipeline::new(storage, config, job).unwrap_or_else(|e| fail(&e));
    let engine = BarcodeEngine::new_with_monitoring(pipeline, args.monitor).with_dry_run(args.dry_run);

    let run_report = match engine.run().await {
        Ok(run_report) => run_report,
        Err(e) => fail(&e),
    };

    if let Some(warning) = run_report.batch.shortfall() {
        eprintln!("⚠️ {}", warning.user_friendly_message());
    }
    if !args.dry_run {
        let failures = run_report.render_failures();
        if failures > 0 {
            eprintln!("⚠️ {} barcodes could not be rendered", failures);
        }
    }

    match args.format {
        OutputFormat::Text => print!("{}", report::format_text(&run_report)),
        OutputFormat::Json => println!("{}", report::format_json(&run_report)?),
    }

    Ok(())
}
