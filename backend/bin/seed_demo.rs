use anyhow::Result;
use clap::Parser;
use oracle_challenger::{
    constants::DAILY_STAR_LIMIT,
    models::{Address, Profile},
    open_store,
    services::{ChainDataService, StaticIdentity},
    utils::{init_logging, config::Config, StoreBackend},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(about = "Fill the configured store with reproducible demo profiles and stars")]
struct Args {
    /// Number of demo users to create
    #[arg(long, default_value_t = 20)]
    users: usize,

    /// RNG seed; the same seed always produces the same data
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    if args.users < 2 {
        return Err(anyhow::anyhow!("--users must be at least 2"));
    }

    let config = Config::from_env()?;
    if config.store_backend == StoreBackend::Memory {
        warn!("⚠️  Seeding the in-memory store; data disappears when this process exits");
    }
    let store = open_store(&config).await?;
    let mut rng = StdRng::seed_from_u64(args.seed);

    let addresses = (1..=args.users)
        .map(|i| Address::parse(&format!("user{}.eth", i)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut given = 0u64;
    for (i, address) in addresses.iter().enumerate() {
        let wallet = Arc::new(StaticIdentity::approving(address.clone()));
        let service = ChainDataService::new(store.clone(), wallet);
        let session = service.connect().await?;

        let profile = Profile::new(format!("Demo User {}", i + 1))
            .with_github(format!("https://github.com/demo-user-{}", i + 1));
        service.save_profile(&session, profile).await?;

        let stars = rng.random_range(0..=DAILY_STAR_LIMIT);
        for _ in 0..stars {
            let target = &addresses[rng.random_range(0..addresses.len())];
            if target == address {
                continue;
            }
            match service.give_star(&session, target, None).await {
                Ok(_) => given += 1,
                Err(e) => warn!("Skipping star {} -> {}: {}", address, target, e),
            }
        }
    }

    info!("✅ Seeded {} profiles and {} stars", addresses.len(), given);

    let reader = ChainDataService::read_only(store);
    for (rank, entry) in reader.get_top_users_default().await?.iter().enumerate() {
        info!("#{} {} - {} stars", rank + 1, entry.address, entry.stars);
    }

    Ok(())
}
