use crate::cli::ServeArgs;
use crate::infra::{reference_districts, AppState, InMemoryDistrictRepository};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use sovi_portal::config::AppConfig;
use sovi_portal::error::AppError;
use sovi_portal::sovi::{PortalService, ScoringConfig};
use sovi_portal::telemetry;
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

    let repository = Arc::new(InMemoryDistrictRepository::default());
    let service = Arc::new(PortalService::new(repository, ScoringConfig::reference()));

    if args.seed {
        for district in reference_districts() {
            service.create_district(district)?;
        }
        info!("reference district roster registered");
    }

    let app = with_portal_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "sovi data portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
