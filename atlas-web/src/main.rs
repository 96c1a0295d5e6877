use std::sync::Arc;

use atlas_migrations::Migrator;
use atlas_shared::clients::db::create_pool;
use atlas_web::config::AppConfig;
use atlas_web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    atlas_shared::middleware::init_tracing("atlas-web");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url, config.db_pool_size)?;
    let migrator = Migrator::bundled()?;

    if config.run_migrations {
        let mut conn = db.get()?;
        let applied = migrator.run_pending(&mut *conn)?;
        tracing::info!(count = applied.len(), "startup migrations complete");
    }

    let metrics_handle = atlas_shared::middleware::init_metrics()?;

    let state = Arc::new(AppState {
        config,
        db,
        migrator,
        metrics_handle,
    });

    let app = atlas_web::router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "atlas-web starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
