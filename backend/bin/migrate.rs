use anyhow::Result;
use clap::Parser;
use oracle_challenger::{
    db::{get_db_pool, migrations::run_migrations, DatabaseConfig},
    utils::{init_logging, Config},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Apply the Postgres schema for the profile and star ledger")]
struct Args {
    /// Connection string to use instead of DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = args.database_url {
        config.database_url = Some(url);
    }

    let db_config = DatabaseConfig::from_config(&config)?;
    let pool = get_db_pool(&db_config).await?;

    info!("🔄 Running database migrations...");
    let known = run_migrations(&pool).await?;
    info!("✅ Schema up to date ({} migrations known)", known);

    Ok(())
}
