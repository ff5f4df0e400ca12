use sea_orm::EntityTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use numera::models::counter::Entity as Counter;
use numera::{config, db, seed};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "numera=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    // Check for --profile CLI argument
    let args: Vec<String> = std::env::args().collect();
    let profile_override = args
        .iter()
        .position(|arg| arg == "--profile")
        .and_then(|pos| args.get(pos + 1))
        .cloned();

    let config = config::Config::with_profile_override(profile_override);

    // Initialize database (runs migrations and seeds the counter definitions)
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to initialize database");

    // Check for seed flag
    if std::env::var("SEED_DEMO").is_ok() {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&db).await {
            tracing::error!("Failed to seed data: {}", e);
        } else {
            tracing::info!("Demo data seeded successfully.");
        }
    }

    // Report counter status
    let counters = Counter::find()
        .all(&db)
        .await
        .expect("Failed to load counter definitions");

    for counter in &counters {
        tracing::info!(
            "counter {}: style={} sequence={}",
            counter.screen_id,
            counter.format_style,
            counter.sequence_value.unwrap_or(0)
        );
    }

    tracing::info!(
        "{} counter definitions ready in {} (profile '{}')",
        counters.len(),
        config.database_url,
        config.profile
    );
}
