use cep_race::core::ConfigProvider;
use cep_race::utils::{logger, validation::Validate};
use cep_race::{app, ConfigArgs, LookupService};
use clap::Parser;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "cep-race")]
#[command(about = "Resolves Brazilian postal codes by racing BrasilAPI against ViaCep")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.config.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(config.log_format, config.verbose);

    tracing::info!("Starting cep-race");
    tracing::debug!("Service config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let service = Arc::new(LookupService::from_config(&config)?);
    let router = app::router(Arc::clone(&service));

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    tracing::info!("🌐 Listening on http://{}", listener.local_addr()?);
    tracing::info!(
        "⏱️ Race timeout: {} ms (BrasilAPI: {}, ViaCep: {})",
        config.timeout_ms(),
        config.brasil_api_url(),
        config.via_cep_url()
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service.shutdown().await;
    tracing::info!("✅ Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
