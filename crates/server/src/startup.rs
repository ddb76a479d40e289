use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};
use service::auth::{repo::seaorm::SeaOrmUserRepository, service::AuthConfig, AuthService};
use service::interface_info::{repository::SeaOrmInterfaceInfoRepository, InterfaceInfoService};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `config.toml` (or `CONFIG_PATH`) when readable, otherwise environment variables only.
pub fn load_config() -> Result<AppConfig, StartupError> {
    match configs::load_default() {
        Ok(mut cfg) => {
            cfg.normalize_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
            Ok(cfg)
        }
        Err(e) => {
            warn!(err = %e, "config file unavailable, falling back to environment");
            AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
        }
    }
}

/// Wire SeaORM repositories into the services shared by all handlers.
pub fn build_state(db: DatabaseConnection, cfg: &AppConfig) -> ServerState {
    let users = Arc::new(SeaOrmUserRepository { db: db.clone() });
    let auth = AuthService::new(users, AuthConfig { jwt_secret: cfg.auth.jwt_secret.clone() });
    let interfaces = Arc::new(SeaOrmInterfaceInfoRepository { db });
    ServerState {
        auth: Arc::new(auth),
        interface_info: Arc::new(InterfaceInfoService::new(interfaces)),
        admin_role: cfg.auth.admin_role.clone(),
    }
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;

    // DB connection + schema
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    models::db::test_connection(&db).await.map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None).await.map_err(|e| StartupError::Database(e.to_string()))?;
    info!("migrations applied");

    let state = build_state(db, &cfg);
    let app: Router = routes::build_router(state, build_cors());

    // Bind and serve
    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
