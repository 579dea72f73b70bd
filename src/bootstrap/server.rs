use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use http::HeaderValue;
use tokio::sync::broadcast;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bootstrap::app_context::{AppContext, AppServices};
use crate::bootstrap::config::Config;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::menu_item_repository_sqlx::SqlxMenuItemRepository;
use crate::infrastructure::db::repositories::request_repository_sqlx::SqlxRequestRepository;
use crate::infrastructure::db::repositories::shelf_repository_sqlx::SqlxShelfRepository;
use crate::infrastructure::messaging::kafka_producer::KafkaEventPublisher;
use crate::infrastructure::messaging::status_broadcast::BroadcastStatusNotifier;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::requests::create_request,
        crate::presentation::http::requests::get_request,
        crate::presentation::http::requests::list_menu_items,
        crate::presentation::http::requests::list_active_requests,
        crate::presentation::http::requests::status_updates,
        crate::presentation::http::health::health,
    ),
    components(schemas(
        crate::presentation::http::requests::CreateRequestBody,
        crate::presentation::http::requests::RequestedMenuItemBody,
        crate::presentation::http::requests::RequestResponse,
        crate::presentation::http::requests::RequestMenuItemResponse,
        crate::presentation::http::requests::MenuItemResponse,
        crate::presentation::http::requests::RequestStatusResponse,
        crate::presentation::http::error::ErrorBody,
        crate::presentation::http::health::HealthResp,
    )),
    tags(
        (name = "Requests", description = "Customer requests and their packing progress"),
        (name = "Health", description = "System health checks")
    )
)]
pub struct ApiDoc;

/// Wires the Postgres repositories, the Kafka publisher and the status
/// broadcast into a context.
pub fn build_context(cfg: Config, pool: PgPool) -> anyhow::Result<AppContext> {
    let publisher = Arc::new(KafkaEventPublisher::new(&cfg.kafka)?);
    let (status_tx, _) = broadcast::channel(cfg.notification_buffer);
    let notifier = Arc::new(BroadcastStatusNotifier::new(status_tx.clone()));

    let services = AppServices::new(
        Arc::new(SqlxRequestRepository::new(pool.clone())),
        Arc::new(SqlxMenuItemRepository::new(pool.clone())),
        Arc::new(SqlxShelfRepository::new(pool)),
        publisher.clone(),
        publisher.clone(),
        publisher,
        status_tx,
        notifier,
        Arc::new(SystemClock),
    );
    Ok(AppContext::new(cfg, services))
}

fn cors_layer(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT]);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        Some(Err(_)) | None if !cfg.is_production => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
        // production without a usable origin: deny cross-origin calls
        _ => base.allow_origin(AllowOrigin::exact(HeaderValue::from_static(
            "http://invalid",
        ))),
    }
}

pub fn build_router(ctx: AppContext, pool: PgPool) -> Router {
    let cors = cors_layer(&ctx.cfg);
    Router::new()
        .merge(crate::presentation::http::health::routes(pool))
        .merge(crate::presentation::http::requests::routes(ctx))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        )
}
