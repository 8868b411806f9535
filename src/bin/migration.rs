use clap::{Parser, Subcommand};
use material_wastage_api::{config, db, migrator::Migrator};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "migration",
    about = "Apply or roll back the material wastage database schema",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Database URL; defaults to the configured database_url"
    )]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply all pending migrations
    Up,
    /// Roll back applied migrations
    Down {
        #[arg(long, default_value_t = 1, help = "Number of migrations to roll back")]
        steps: u32,
    },
    /// Show which migrations are applied
    Status,
    /// Drop every table and re-apply all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    config::init_tracing("info", false);

    let database_url = match cli.database_url {
        Some(url) => url,
        None => config::load_config()?.database_url,
    };

    info!("Connecting to database for migrations");
    let pool = db::establish_connection(&database_url).await?;

    let result = match cli.command {
        Command::Up => Migrator::up(&pool, None).await,
        Command::Down { steps } => Migrator::down(&pool, Some(steps)).await,
        Command::Status => Migrator::status(&pool).await,
        Command::Fresh => Migrator::fresh(&pool).await,
    };

    if let Err(e) = &result {
        error!("Migration command failed: {}", e);
    } else {
        info!("Migration command completed successfully");
    }

    db::close_pool(pool).await?;
    result.map_err(Into::into)
}
