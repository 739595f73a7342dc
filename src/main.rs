use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paysim_core::cli::{Cli, Commands};
use paysim_core::config::Config;
use paysim_core::directory::MerchantDirectory;
use paysim_core::domain::intent::PaymentIntent;
use paysim_core::ledger::TransactionLedger;
use paysim_core::parser;
use paysim_core::random::ThreadRandom;
use paysim_core::remote::RemoteClient;
use paysim_core::resolver::TransactionResolver;
use paysim_core::services::PaymentOrchestrator;
use paysim_core::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Parse { raw } => {
            let mut intent = parser::parse(&raw);
            MerchantDirectory::new().enrich(&mut intent);
            println!("{}", serde_json::to_string_pretty(&intent)?);
            Ok(())
        }
        Commands::Pay {
            amount,
            payee,
            upi_id,
        } => {
            let ledger = TransactionLedger::new();
            let resolver = TransactionResolver::new(ledger, Arc::new(ThreadRandom));
            let remote = RemoteClient::new(config.remote_pay_url.clone(), config.remote_timeout);
            let orchestrator = PaymentOrchestrator::new(remote, resolver, config.min_latency);

            let intent = PaymentIntent {
                merchant_name: payee,
                payee_id: upi_id,
                amount: amount.trim().parse().ok(),
                ..Default::default()
            };
            let receipt = orchestrator.submit_payment(&intent).await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let ledger = TransactionLedger::new();
    let resolver = TransactionResolver::new(ledger.clone(), Arc::new(ThreadRandom));
    let state = AppState {
        ledger,
        directory: Arc::new(MerchantDirectory::new()),
        resolver,
        processing_delay: config.processing_delay,
    };
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
