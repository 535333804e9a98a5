use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_registry_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use barangay_registry::config::AppConfig;
use barangay_registry::error::AppError;
use barangay_registry::residents::{InMemoryResidentRepository, ResidentRegistryService};
use barangay_registry::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryResidentRepository::default());
    let registry_service = Arc::new(ResidentRegistryService::new(
        repository,
        config.registry.access_policy(),
    ));

    let app = with_registry_routes(registry_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        elevated_roles = ?config.registry.elevated_roles,
        "resident registry ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
