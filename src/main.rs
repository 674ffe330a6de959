use clap::Parser;
use parcel_pricer::config::{OutputFormat, RunSettings};
use parcel_pricer::core::estimator::PriceEstimator;
use parcel_pricer::domain::ports::CreditLedger;
use parcel_pricer::utils::error::{ErrorSeverity, PricerError};
use parcel_pricer::utils::logger::{self, LogFormat};
use parcel_pricer::{
    CliConfig, FileComparableSource, FileCreditLedger, InMemoryCreditLedger, LocalStorage,
    ValuationEngine, ValuationOutcome,
};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(LogFormat::from_json_flag(config.json_logs), config.verbose);

    tracing::info!("Starting parcel-pricer CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 解析並驗證配置
    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if settings.show_saved {
        let engine = build_engine(&settings, InMemoryCreditLedger::new(0));
        match engine.load_record(&settings.target).await {
            Ok(record) => {
                match settings.output_format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                    OutputFormat::Text => {
                        println!("💰 Predicted price: {}", record.predicted_price);
                        println!("🎯 Confidence: {}%", record.confidence_score);
                        println!();
                        println!("{}", record.price_reasoning);
                        println!();
                        println!("🕒 Saved at: {}", record.saved_at.to_rfc3339());
                    }
                }
                return Ok(());
            }
            Err(e) => {
                tracing::error!("❌ Could not load saved record: {}", e);
                eprintln!("❌ No saved estimate for {}", settings.target.key());
                std::process::exit(1);
            }
        }
    }

    let result = match &settings.ledger_path {
        Some(path) => {
            let ledger = FileCreditLedger::open(path, settings.initial_credits).await?;
            run_valuation(&settings, ledger).await
        }
        None => {
            let ledger = InMemoryCreditLedger::new(settings.initial_credits);
            run_valuation(&settings, ledger).await
        }
    };

    match result {
        Ok(outcome) => {
            tracing::info!("✅ Valuation completed successfully!");
            print_outcome(&settings, &outcome)?;
        }
        Err(e) => {
            tracing::error!(
                "❌ Valuation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn build_engine<L: CreditLedger>(
    settings: &RunSettings,
    ledger: L,
) -> ValuationEngine<FileComparableSource, L, LocalStorage> {
    let source = FileComparableSource::new(&settings.comparables_path)
        .require_zip_code(settings.require_zip_code);
    let storage = LocalStorage::new(settings.output_path.clone());
    ValuationEngine::with_estimator(source, ledger, storage, PriceEstimator::new(settings.estimator))
}

async fn run_valuation<L: CreditLedger>(
    settings: &RunSettings,
    ledger: L,
) -> Result<ValuationOutcome, PricerError> {
    build_engine(settings, ledger).run(&settings.target).await
}

fn print_outcome(settings: &RunSettings, outcome: &ValuationOutcome) -> anyhow::Result<()> {
    let saved_to = Path::new(&settings.output_path).join(&outcome.record_path);

    match settings.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        OutputFormat::Text => {
            println!("💰 Predicted price: {}", outcome.estimate.predicted_price);
            println!("🎯 Confidence: {}%", outcome.estimate.confidence_score);
            println!();
            println!("{}", outcome.estimate.reasoning);
            println!();
            println!("📁 Record saved to: {}", saved_to.display());
            println!("💳 Credits remaining: {}", outcome.credits_remaining);
        }
    }

    Ok(())
}
