//! Main entry point for the Insight Manager server.

use std::sync::Arc;

use insight_migration::{Migrator, MigratorTrait};
use insight_persistence::{ExternalDbPersistService, PersistenceService};
use insight_server::{
    model::{AppState, Configuration},
    startup::{self, GracefulShutdown},
};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let configuration = Configuration::new()?;

    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    configuration.validate()?;

    let db = configuration.database_connection().await?;
    if configuration.run_migrations() {
        info!("Applying database migrations");
        Migrator::up(&db, None).await?;
    }

    let persistence: Arc<dyn PersistenceService> = Arc::new(ExternalDbPersistService::new(db));

    let address = configuration.server_address();
    let port = configuration.server_port();
    let shutdown_timeout = configuration.shutdown_timeout();

    let app_state = Arc::new(AppState::new(configuration, persistence));

    let server = startup::main_server(app_state, address.clone(), port)?;
    info!("Insight Manager listening on {}:{}", address, port);

    let shutdown_signal = startup::wait_for_shutdown_signal();
    let graceful_shutdown = GracefulShutdown::new(shutdown_signal, shutdown_timeout);
    let handle = server.handle();

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
                return Err(e.into());
            }
        }
        _ = graceful_shutdown.wait_for_shutdown(handle) => {
            info!("HTTP server shut down gracefully");
        }
    }

    Ok(())
}
