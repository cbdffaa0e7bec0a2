use bolivia_gabinete::utils::error::{DirectoryError, ErrorSeverity};
use bolivia_gabinete::utils::{logger, validation::Validate};
use bolivia_gabinete::{CliConfig, DirectoryEngine, LocalStorage};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting bolivia-gabinete");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    let source = match config.source() {
        Ok(source) => source,
        Err(e) => exit_with(e),
    };
    let engine = DirectoryEngine::new(source);

    let outcome = match (&cli.history, &config.output_path) {
        (Some(entity_id), _) => engine.history(entity_id).await.map(|text| println!("{}", text)),
        (None, Some(output_path)) => {
            let storage = LocalStorage::new(output_path.clone());
            engine
                .run(&config.kind, config.format, &storage)
                .await
                .map(|written| tracing::info!("Listing saved to: {}", written))
        }
        (None, None) => engine
            .render(&config.kind, config.format)
            .await
            .map(|text| println!("{}", text)),
    };

    if let Err(e) = outcome {
        exit_with(e);
    }
    Ok(())
}

fn exit_with(e: DirectoryError) -> ! {
    tracing::error!(
        "Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
