//! Demo binary: one console-driven assessment conversation.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dermassist::adapters::console::ConsoleFrontEnd;
use dermassist::adapters::flatfile::FlatFileRecordStore;
use dermassist::adapters::postgres::PostgresRecordStore;
use dermassist::config::AppConfig;
use dermassist::domain::conversation::ConversationEngine;
use dermassist::ports::RecordStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let store: Arc<dyn RecordStore> = match &config.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            let store = PostgresRecordStore::new(pool);
            store.init_schema().await?;
            info!("using postgres record store");
            Arc::new(store)
        }
        None => {
            info!(path = %config.store.path.display(), "using flat-file record store");
            Arc::new(FlatFileRecordStore::new(config.store.path.clone()))
        }
    };

    let engine = ConversationEngine::new(store).with_scoring(config.scoring);
    ConsoleFrontEnd::new(engine).run().await?;

    Ok(())
}
