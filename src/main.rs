// src/main.rs

use gradebook::Database;
use gradebook::config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (and .env, if present)
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "gradebook.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    // Opening also creates any missing tables
    let db = Database::open(&config.database_url).await?;

    let exercises = db.exercises().load_exercises().await;
    db.close().await;
    let exercises = exercises?;

    tracing::info!("Loaded {} exercises", exercises.len());
    println!("{}", serde_json::to_string_pretty(&exercises)?);

    Ok(())
}
