use anyhow::Result;
use clap::Parser;
use oracle_challenger::{
    constants::GATEWAY_CHECK_INTERVAL_SECS,
    services::GatewayClient,
    utils::{init_logging, config::Config},
};
use std::time::Duration;
use tokio::time;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(about = "Periodically probe the chain gateway and log its reachability")]
struct Args {
    /// Probe once and exit with an error if the gateway is down
    #[arg(long)]
    once: bool,

    /// Seconds between probes
    #[arg(long, default_value_t = GATEWAY_CHECK_INTERVAL_SECS)]
    interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = Config::from_env()?;
    let gateway = GatewayClient::new(config.chain_gateway_url.clone());

    info!("🔗 Starting gateway checker for {}", gateway.base_url());

    if args.once {
        let status = gateway.probe().await?;
        info!("✅ Gateway up (chain {:?}, {} ms)", status.chain_id, status.latency_ms);
        return Ok(());
    }

    run_gateway_checker(gateway, Duration::from_secs(args.interval.max(1))).await
}

async fn run_gateway_checker(gateway: GatewayClient, every: Duration) -> Result<()> {
    let mut interval = time::interval(every);
    let mut consecutive_failures: u32 = 0;
    let mut last_chain_id: Option<String> = None;

    loop {
        interval.tick().await;

        match gateway.probe().await {
            Ok(status) => {
                if consecutive_failures > 0 {
                    info!("✅ Gateway recovered after {} failed probes", consecutive_failures);
                }
                consecutive_failures = 0;

                if last_chain_id.is_some() && status.chain_id != last_chain_id {
                    warn!("⚠️  Gateway chain id changed: {:?} -> {:?}", last_chain_id, status.chain_id);
                }
                info!("📊 Gateway up (chain {:?}, {} ms)", status.chain_id, status.latency_ms);
                last_chain_id = status.chain_id;
            }
            Err(e) => {
                consecutive_failures += 1;
                error!("❌ Gateway probe failed ({} in a row): {}", consecutive_failures, e);
            }
        }
    }
}
