use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
};
use anyhow::Result;
use axum::{
    Extension, Router,
    http::{
        Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::infra;
use infra::db::postgres::postgres_connection::PgPoolSquad;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

pub fn app(config: &DotEnvyConfig, db_pool: Arc<PgPoolSquad>) -> Result<Router> {
    let user_secret = Arc::new(config.user_secret.clone());

    let api = Router::new()
        .nest(
            "/auth",
            routers::auth::routes(Arc::clone(&db_pool), Arc::clone(&user_secret)),
        )
        .nest(
            "/users",
            routers::users::routes(Arc::clone(&db_pool), Arc::clone(&user_secret)),
        )
        .nest("/therapists", routers::therapists::routes(Arc::clone(&db_pool)))
        .nest(
            "/relationships",
            routers::relationships::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/appointments",
            routers::appointments::routes(Arc::clone(&db_pool)),
        )
        .merge(routers::conversations::routes(Arc::clone(&db_pool)))
        .nest("/journals", routers::journals::routes(Arc::clone(&db_pool)))
        .nest("/surveys", routers::surveys::routes(Arc::clone(&db_pool)))
        .nest("/documents", routers::documents::routes(Arc::clone(&db_pool)))
        .nest("/invoices", routers::invoices::routes(Arc::clone(&db_pool)))
        .nest("/reviews", routers::reviews::routes(Arc::clone(&db_pool)))
        .route("/health-check", get(default_routers::health_check));

    let app = Router::new()
        .nest("/api", api)
        .fallback(default_routers::not_found)
        .layer(Extension(Arc::clone(&user_secret)))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.backend_server.timeout),
        ))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let app = app(&config, db_pool)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(
        port = config.backend_server.port,
        stage = %config.stage,
        "Server is running"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = ?err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
