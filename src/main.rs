use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use postd::config::Config;
use postd::seed::Readiness;
use postd::store::{Auditing, FixedActor, MemoryStore, MongoStore, PostStore};
use postd::{handlers, Error, Server};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let audit = if config.auditing {
        Auditing::enabled(Arc::new(FixedActor(config.audit_actor.clone())))
    } else {
        Auditing::disabled()
    };

    let store: Arc<dyn PostStore> = match &config.mongodb_url {
        Some(url) => {
            info!(database = %config.mongodb_database, "using mongodb store");
            Arc::new(MongoStore::connect(url, &config.mongodb_database, audit).await?)
        }
        None => {
            info!("no POSTD_MONGODB_URL set, using in-memory store");
            Arc::new(MemoryStore::new(audit))
        }
    };

    // Fire-and-forget: the listener does not wait for seeding. /readyz
    // reports 503 until the task finishes.
    let readiness = Arc::new(Readiness::default());
    let seeding_store = Arc::clone(&store);
    let seeding_flag = Arc::clone(&readiness);
    tokio::spawn(async move {
        postd::seed::run(seeding_store).await;
        seeding_flag.mark_ready();
    });

    let app = handlers::app(store, readiness);
    Server::bind(&config.listen_addr).await?.serve(app).await
}
