//! EquiChain notary service binary

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use equichain_notary::{
    api,
    chain::rpc::HttpChainClient,
    chain::signer::AccountSigner,
    config::Args,
    ledger::SqliteClaimLedger,
    scorer::TrustedRecordTable,
    NotaryService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("equichain_notary={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let signer = match AccountSigner::from_hex_key(args.signing_key.as_deref().unwrap_or_default()) {
        Ok(s) => s,
        Err(e) => {
            error!("Signing key error: {}", e);
            std::process::exit(1);
        }
    };

    info!("======================================");
    info!("  EquiChain Notary");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Ledger node: {}", args.rpc_url);
    info!("Account: {}", signer.address());
    info!("Claim ledger: {}", args.claim_db.display());
    info!("Funds floor: {} native units", args.funds_floor);
    info!("======================================");

    let trusted = match TrustedRecordTable::load(&args.trusted_records) {
        Ok(t) => t,
        Err(e) => {
            error!("Trusted record dataset error: {}", e);
            std::process::exit(1);
        }
    };

    let ledger = match SqliteClaimLedger::open(&args.claim_db) {
        Ok(l) => Arc::new(l),
        Err(e) => {
            error!("Claim ledger error: {}", e);
            std::process::exit(1);
        }
    };

    let chain = Arc::new(HttpChainClient::new(&args.rpc_url));
    let service = Arc::new(NotaryService::new(
        chain,
        signer,
        ledger,
        trusted,
        args.pipeline_config()?,
    ));

    let router = api::create_router(service);
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("API listening on {}", args.listen);

    axum::serve(listener, router).await?;

    Ok(())
}
