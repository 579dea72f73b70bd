use std::convert::Infallible;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{Stream, StreamExt, stream};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::application::dto::requests::{
    MenuItemDto, RequestDto, RequestMenuItemDto, RequestStatusDto,
};
use crate::application::use_cases::requests::create_request::{
    CreateRequest, NewRequest, RequestedMenuItem,
};
use crate::application::use_cases::requests::get_request::GetRequest;
use crate::application::use_cases::requests::list_active::ListActiveRequests;
use crate::application::use_cases::requests::list_menu_items::ListMenuItems;
use crate::bootstrap::app_context::AppContext;
use crate::domain::requests::request::RequestStatus;
use crate::domain::shelf::shelf_item::PackingStatus;
use crate::presentation::http::error::ApiError;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestedMenuItemBody {
    pub menu_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    /// Accepted as a JSON number or a numeric string.
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub customer_id: i32,
    pub menu_items: Vec<RequestedMenuItemBody>,
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("customerId `{s}` is not a number")))?,
    };
    i32::try_from(value).map_err(|_| serde::de::Error::custom("customerId is out of range"))
}

impl From<CreateRequestBody> for NewRequest {
    fn from(body: CreateRequestBody) -> Self {
        NewRequest {
            customer_id: body.customer_id,
            menu_items: body
                .menu_items
                .into_iter()
                .map(|i| RequestedMenuItem {
                    menu_id: i.menu_id,
                    quantity: i.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestMenuItemResponse {
    pub id: i32,
    pub menu_item_id: i32,
    pub menu_item_name: String,
    pub quantity: i32,
    pub prepared: i32,
    pub immediate_preparation: bool,
    pub finished: bool,
}

impl From<RequestMenuItemDto> for RequestMenuItemResponse {
    fn from(d: RequestMenuItemDto) -> Self {
        let finished = d.is_finished();
        Self {
            id: d.id,
            menu_item_id: d.menu_item_id,
            menu_item_name: d.menu_item_name,
            quantity: d.quantity,
            prepared: d.prepared,
            immediate_preparation: d.immediate_preparation,
            finished,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    pub request_id: i32,
    pub customer_id: i32,
    pub menu_items: Vec<RequestMenuItemResponse>,
    pub prepared_items_count: i32,
    pub total_items_count: i32,
    #[schema(value_type = String, example = "IN_PROGRESS")]
    pub status: RequestStatus,
}

impl From<RequestDto> for RequestResponse {
    fn from(d: RequestDto) -> Self {
        Self {
            request_id: d.request_id,
            customer_id: d.customer_id,
            menu_items: d.menu_items.into_iter().map(Into::into).collect(),
            prepared_items_count: d.prepared_items_count,
            total_items_count: d.total_items_count,
            status: d.status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    pub menu_id: i32,
    pub name: String,
}

impl From<MenuItemDto> for MenuItemResponse {
    fn from(d: MenuItemDto) -> Self {
        Self {
            menu_id: d.menu_id,
            name: d.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatusResponse {
    pub request_id: i32,
    #[schema(value_type = String, example = "REQUESTED_ITEMS")]
    pub status: PackingStatus,
    pub prepared_items: i32,
    pub total_items: i32,
}

impl From<RequestStatusDto> for RequestStatusResponse {
    fn from(d: RequestStatusDto) -> Self {
        Self {
            request_id: d.request_id,
            status: d.status,
            prepared_items: d.prepared_items,
            total_items: d.total_items,
        }
    }
}

#[utoipa::path(
    post,
    path = "/request",
    tag = "Requests",
    request_body = CreateRequestBody,
    responses(
        (status = 201, body = RequestResponse),
        (status = 400, body = crate::presentation::http::error::ErrorBody),
        (status = 404, body = crate::presentation::http::error::ErrorBody, description = "Unknown menu item")
    )
)]
pub async fn create_request(
    State(ctx): State<AppContext>,
    payload: Result<Json<CreateRequestBody>, JsonRejection>,
) -> Result<(StatusCode, Json<RequestResponse>), ApiError> {
    let Json(body) = payload.map_err(|rej| ApiError::bad_request(rej.body_text()))?;
    let requests = ctx.request_repo();
    let menu = ctx.menu_repo();
    let shelf_events = ctx.shelf_events();
    let status_events = ctx.status_events();
    let uc = CreateRequest {
        requests: requests.as_ref(),
        menu: menu.as_ref(),
        shelf_events: shelf_events.as_ref(),
        status_events: status_events.as_ref(),
    };
    let created = uc.execute(&body.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/request/{request_id}",
    tag = "Requests",
    params(("request_id" = i32, Path, description = "Request id")),
    responses(
        (status = 200, body = RequestResponse),
        (status = 400, body = crate::presentation::http::error::ErrorBody),
        (status = 404, body = crate::presentation::http::error::ErrorBody)
    )
)]
pub async fn get_request(
    State(ctx): State<AppContext>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<RequestResponse>, ApiError> {
    let Path(request_id) = path.map_err(|rej| ApiError::bad_request(rej.body_text()))?;
    let requests = ctx.request_repo();
    let menu = ctx.menu_repo();
    let uc = GetRequest {
        requests: requests.as_ref(),
        menu: menu.as_ref(),
    };
    Ok(Json(uc.execute(request_id).await?.into()))
}

#[utoipa::path(
    get,
    path = "/request/menu-items",
    tag = "Requests",
    responses((status = 200, body = [MenuItemResponse]))
)]
pub async fn list_menu_items(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<MenuItemResponse>>, ApiError> {
    let menu = ctx.menu_repo();
    let uc = ListMenuItems {
        menu: menu.as_ref(),
    };
    let items = uc.execute().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/request",
    tag = "Requests",
    responses((status = 200, description = "One `request` event per active request, then the stream ends", content_type = "text/event-stream"))
)]
pub async fn list_active_requests(
    State(ctx): State<AppContext>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let requests = ctx.request_repo();
    let menu = ctx.menu_repo();
    let uc = ListActiveRequests {
        requests: requests.as_ref(),
        menu: menu.as_ref(),
    };
    let active = uc.execute().await?;
    let events = stream::iter(active.into_iter().map(|dto| {
        Event::default()
            .id(dto.request_id.to_string())
            .event("request")
            .json_data(RequestResponse::from(dto))
    }));
    Ok(Sse::new(events))
}

#[utoipa::path(
    get,
    path = "/request/notification/status",
    tag = "Requests",
    responses((status = 200, description = "`request-status-update` events as requests progress", content_type = "text/event-stream"))
)]
pub async fn status_updates(
    State(ctx): State<AppContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let updates = ctx.subscribe_status_notifications().filter_map(|n| async move {
        let id = n.request_id.to_string();
        match Event::default()
            .id(id)
            .event("request-status-update")
            .json_data(RequestStatusResponse::from(n))
        {
            Ok(event) => Some(Ok(event)),
            Err(err) => {
                tracing::warn!(request_id = n.request_id, error = %err, "status_event_encode_failed");
                None
            }
        }
    });
    Sse::new(updates).keep_alive(KeepAlive::new().interval(ctx.cfg.sse_keepalive))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/request", get(list_active_requests).post(create_request))
        .route("/request/menu-items", get(list_menu_items))
        .route("/request/notification/status", get(status_updates))
        .route("/request/:request_id", get(get_request))
        .with_state(ctx)
}
