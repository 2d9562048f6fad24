use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use depot_storage::config::environment::EnvironmentConfig;
use depot_storage::config::{AREAS, MAX_CAPACITY};
use depot_storage::middleware::cors::cors_middleware;
use depot_storage::routes;
use depot_storage::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenvy::dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🅿️ Depósito de Vehículos - Registro de Ocupación y Tarifas");
    info!("==========================================================");

    let config = EnvironmentConfig::default();
    let state = AppState::new(config.clone());

    // Al arrancar: persistir una vez para crear los archivos si faltan
    {
        let yard = state.yard.read().await;
        if let Err(e) = state.storage.save(&yard) {
            error!("❌ Error persistiendo estado inicial: {}", e);
            return Err(anyhow::anyhow!("Error de persistencia: {}", e));
        }
        info!(
            "✅ Estado cargado: {} vehículos en {} zonas, {} estancias en historial",
            yard.store.total(),
            AREAS,
            yard.ledger.len()
        );
    }

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api", routes::create_api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Health check");
    info!("   GET    /api/overview - Resumen de ocupación");
    info!("   POST   /api/vehicle - Ingresar vehículo");
    info!("   GET    /api/vehicle/search?q= - Buscar por VIN o código");
    info!("   DELETE /api/vehicle/:id - Retirar vehículo");
    info!("   POST   /api/vehicle/:id/move - Mover de zona");
    info!("   GET    /api/history?q= - Historial reciente");
    info!("   GET    /api/export/current.csv - Export vehículos actuales");
    info!("   GET    /api/export/checkins.csv?from=&to= - Export entradas");
    info!("   GET    /api/export/checkouts.csv?from=&to= - Export salidas");
    info!("   POST   /api/scan - Escanear imagen (OCR)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "capacity": MAX_CAPACITY,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
