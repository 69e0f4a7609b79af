use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use taskhub_api::app::{build_router, AppState};
use taskhub_api::config::Config;
use taskhub_shared::db::pool::create_pool;
use taskhub_shared::db::schema;
use taskhub_shared::db::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhub_api=debug,taskhub_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting TaskHub API server");

    let pool = create_pool(config.pool_config()).await?;
    let store = Store::new(pool);
    schema::init(&store, &config.bootstrap_admin()).await?;
    tracing::info!("Database ready");

    let addr = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
