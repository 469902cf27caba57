use cep_race::utils::{logger, validation::Validate};
use cep_race::{ConfigArgs, LookupKey, LookupOutcome, LookupService};
use clap::Parser;

#[derive(Parser)]
#[command(name = "cep-lookup")]
#[command(about = "One-shot CEP lookup racing BrasilAPI against ViaCep")]
struct Cli {
    /// Postal code to look up
    cep: String,

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
            std::process::exit(1);
        }
    };

    logger::init_logger(config.log_format, config.verbose);

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let service = LookupService::from_config(&config)?;
    let outcome = service.lookup(&LookupKey::from(cli.cep.as_str())).await;
    service.shutdown().await;

    match outcome {
        Ok(LookupOutcome::Resolved(payload)) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        Ok(LookupOutcome::TimedOut) => {
            eprintln!(
                "⏱️ No provider answered {} within {} ms",
                cli.cep, config.timeout_ms
            );
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!("Lookup failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    }
}
